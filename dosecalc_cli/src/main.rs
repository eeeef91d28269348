use clap::{Args, Parser, Subcommand};
use dosecalc_core::calculators::{
    bmi, dilution, drip, fluid_balance, gestation, glasgow, heparin, insulin, oxygen,
};
use dosecalc_core::catalog::{
    self, CYLINDER_TYPES, HEPARIN_PROTOCOLS, INTAKE_PRESETS, MEDICATION_PRESETS, OUTPUT_PRESETS,
    SYRINGE_TYPES,
};
use dosecalc_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "dosecalc")]
#[command(about = "Clinical nursing calculators with a local calculation history", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Args)]
struct SaveArgs {
    /// Dry run - show the result without saving it to history
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available calculators
    List,

    /// Show the built-in reference tables
    Presets,

    /// IV drip rate in drops or microdrops per minute
    Drip {
        /// Volume to infuse (mL)
        #[arg(long)]
        volume: String,

        /// Infusion time
        #[arg(long)]
        time: String,

        /// Unit of --time
        #[arg(long, default_value = "hours", value_parser = ["hours", "minutes"])]
        time_unit: String,

        /// Administration set: macro (20 gtt/mL) or micro (60 µgtt/mL)
        #[arg(long, default_value = "macro", value_parser = ["macro", "micro"])]
        equipment: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Reconstitution of powdered medications
    Dilution {
        /// Medication preset id or name (see `presets`)
        #[arg(long, conflicts_with = "content")]
        medication: Option<String>,

        /// Vial content (mg), when not using a preset
        #[arg(long)]
        content: Option<String>,

        /// Diluent volume (mL); defaults to the preset's standard dilution
        #[arg(long)]
        diluent: Option<String>,

        /// Prescribed dose, in the vial's unit
        #[arg(long)]
        dose: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Fluid intake versus output
    Fluid {
        /// Intake as DESCRIPTION=ML, repeatable
        #[arg(long = "intake")]
        intakes: Vec<String>,

        /// Output as DESCRIPTION=ML, repeatable
        #[arg(long = "output")]
        outputs: Vec<String>,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Body mass index and body surface area
    Bmi {
        /// Weight (kg)
        #[arg(long)]
        weight: String,

        /// Height (cm)
        #[arg(long)]
        height: String,

        /// Skip the body surface area
        #[arg(long)]
        bmi_only: bool,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// U-100 insulin units to syringe volume
    Insulin {
        /// Prescribed units
        #[arg(long)]
        units: String,

        /// Syringe capacity in units: 100, 50 or 30
        #[arg(long, default_value = "100")]
        syringe: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Weight-based heparin bolus and infusion
    Heparin {
        /// Patient weight (kg)
        #[arg(long)]
        weight: String,

        /// Protocol: standard, low or high
        #[arg(long, default_value = "standard")]
        protocol: String,

        /// Solution concentration (UI/mL), overriding the protocol's
        #[arg(long)]
        concentration: Option<String>,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Remaining autonomy of an oxygen cylinder
    Oxygen {
        /// Cylinder: e, d, hk or m
        #[arg(long, default_value = "e")]
        cylinder: String,

        /// Current gauge pressure (PSI)
        #[arg(long)]
        pressure: String,

        /// Flow rate (L/min)
        #[arg(long)]
        flow: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Estimated due date and gestational age
    DueDate {
        /// First day of the last menstrual period (YYYY-MM-DD)
        #[arg(long)]
        lmp: String,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Glasgow Coma Scale
    Glasgow {
        /// Eye opening score (1-4)
        #[arg(long)]
        eye: Option<u8>,

        /// Verbal response score (1-5)
        #[arg(long)]
        verbal: Option<u8>,

        /// Motor response score (1-6)
        #[arg(long)]
        motor: Option<u8>,

        #[command(flatten)]
        save: SaveArgs,
    },

    /// Show the configuration file and its effective settings
    Config {
        /// Write the current settings to the config file if it does not exist yet
        #[arg(long)]
        init: bool,
    },

    /// Browse and manage saved calculations
    History {
        #[command(subcommand)]
        action: Option<HistoryAction>,
    },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// Show saved calculations, newest first (default)
    List {
        /// Only show one calculator (drip, dilution, hydro, imc, oxygen, insulin, heparin, dpp, glasgow)
        #[arg(long = "type")]
        calculator_type: Option<String>,
    },

    /// Delete one saved calculation
    Remove {
        /// Entry id as shown by `history list`
        id: String,
    },

    /// Delete every saved calculation
    Clear,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    dosecalc_core::logging::init_with_level(&config.logging.level);

    // Determine data directory
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Presets => cmd_presets(),
        Commands::Drip {
            volume,
            time,
            time_unit,
            equipment,
            save,
        } => cmd_drip(&data_dir, &volume, &time, &time_unit, &equipment, save.dry_run),
        Commands::Dilution {
            medication,
            content,
            diluent,
            dose,
            save,
        } => cmd_dilution(
            &data_dir,
            medication.as_deref(),
            content.as_deref(),
            diluent.as_deref(),
            &dose,
            save.dry_run,
        ),
        Commands::Fluid {
            intakes,
            outputs,
            save,
        } => cmd_fluid(&data_dir, &intakes, &outputs, save.dry_run),
        Commands::Bmi {
            weight,
            height,
            bmi_only,
            save,
        } => cmd_bmi(&data_dir, &weight, &height, bmi_only, save.dry_run),
        Commands::Insulin {
            units,
            syringe,
            save,
        } => cmd_insulin(&data_dir, &units, &syringe, save.dry_run),
        Commands::Heparin {
            weight,
            protocol,
            concentration,
            save,
        } => cmd_heparin(
            &data_dir,
            &weight,
            &protocol,
            concentration.as_deref(),
            save.dry_run,
        ),
        Commands::Oxygen {
            cylinder,
            pressure,
            flow,
            save,
        } => cmd_oxygen(&data_dir, &cylinder, &pressure, &flow, save.dry_run),
        Commands::DueDate { lmp, save } => cmd_due_date(&data_dir, &lmp, save.dry_run),
        Commands::Glasgow {
            eye,
            verbal,
            motor,
            save,
        } => cmd_glasgow(&data_dir, eye, verbal, motor, save.dry_run),
        Commands::Config { init } => cmd_config(&config, init),
        Commands::History { action } => {
            cmd_history(&data_dir, action.unwrap_or(HistoryAction::List { calculator_type: None }))
        }
    }
}

fn cmd_list() -> Result<()> {
    for (title, category) in [
        ("Essential", CalculatorCategory::Essential),
        ("Specialized", CalculatorCategory::Specialized),
        ("Assessment", CalculatorCategory::Assessment),
    ] {
        println!("{}:", title);
        for info in calculators_by_category(category) {
            println!("  {:<10} {} - {}", info.kind.id(), info.name, info.description);
        }
        println!();
    }
    Ok(())
}

fn cmd_presets() -> Result<()> {
    println!("Medications:");
    for m in &MEDICATION_PRESETS {
        println!(
            "  {:<16} {} ({}, {} mL diluent -> {})",
            m.id, m.name, m.presentation, m.standard_dilution_ml, m.final_concentration
        );
    }

    println!("\nInsulin syringes:");
    for s in &SYRINGE_TYPES {
        println!("  {:<16} {} - {}", s.id, s.name, s.description);
    }

    println!("\nHeparin protocols:");
    for p in &HEPARIN_PROTOCOLS {
        println!(
            "  {:<16} {}: bolus {} UI/kg, infusion {} UI/kg/h, {} UI/mL",
            p.id, p.name, p.bolus_dose, p.infusion_dose, p.concentration
        );
    }

    println!("\nOxygen cylinders:");
    for c in &CYLINDER_TYPES {
        println!(
            "  {:<16} {} ({} L, factor {})",
            c.id, c.name, c.capacity_liters, c.factor
        );
    }

    println!("\nCommon intakes: {}", INTAKE_PRESETS.join(", "));
    println!("Common outputs: {}", OUTPUT_PRESETS.join(", "));
    Ok(())
}

fn cmd_drip(
    data_dir: &Path,
    volume: &str,
    time: &str,
    time_unit: &str,
    equipment: &str,
    dry_run: bool,
) -> Result<()> {
    let input = drip::DripInput {
        volume_ml: positive_arg("volume", volume)?,
        time: positive_arg("time", time)?,
        time_unit: match time_unit {
            "minutes" => drip::TimeUnit::Minutes,
            _ => drip::TimeUnit::Hours,
        },
        equipment: match equipment {
            "micro" => drip::Equipment::Micro,
            _ => drip::Equipment::Macro,
        },
    };

    let rate = drip::calculate(&input).ok_or_else(not_computable)?;
    display_result(&rate);
    finish(data_dir, &rate, dry_run);
    Ok(())
}

fn cmd_dilution(
    data_dir: &Path,
    medication: Option<&str>,
    content: Option<&str>,
    diluent: Option<&str>,
    dose: &str,
    dry_run: bool,
) -> Result<()> {
    let dose = positive_arg("dose", dose)?;

    let mut input = match medication {
        Some(key) => {
            let preset = catalog::find_medication(key)
                .ok_or_else(|| Error::InvalidInput(format!("Unknown medication: {}", key)))?;
            dilution::DilutionInput::from_preset(preset, dose)
        }
        None => {
            let content = content.ok_or_else(|| {
                Error::InvalidInput("Either --medication or --content is required".into())
            })?;
            let diluent = diluent.ok_or_else(|| {
                Error::InvalidInput("--diluent is required with --content".into())
            })?;
            dilution::DilutionInput::manual(
                positive_arg("content", content)?,
                positive_arg("diluent", diluent)?,
                dose,
            )
        }
    };

    // A preset's standard dilution may be overridden
    if let (Some(_), Some(raw)) = (medication, diluent) {
        input.dilution_volume_ml = positive_arg("diluent", raw)?;
    }

    let result = dilution::calculate(&input).ok_or_else(not_computable)?;
    display_result(&result);
    finish(data_dir, &result, dry_run);
    Ok(())
}

fn cmd_fluid(data_dir: &Path, intakes: &[String], outputs: &[String], dry_run: bool) -> Result<()> {
    let mut sheet = fluid_balance::FluidBalanceSheet::new();

    for raw in intakes {
        let (description, volume) = fluid_entry_arg("intake", raw)?;
        sheet
            .add_intake(&description, volume)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid intake: {}", raw)))?;
    }
    for raw in outputs {
        let (description, volume) = fluid_entry_arg("output", raw)?;
        sheet
            .add_output(&description, volume)
            .ok_or_else(|| Error::InvalidInput(format!("Invalid output: {}", raw)))?;
    }

    let balance = fluid_balance::calculate(&sheet).ok_or_else(|| {
        Error::InvalidInput("Add at least one --intake or --output".into())
    })?;
    display_result(&balance);
    println!("  Status: {}", balance.status.label());
    finish(data_dir, &balance, dry_run);
    Ok(())
}

fn cmd_bmi(data_dir: &Path, weight: &str, height: &str, bmi_only: bool, dry_run: bool) -> Result<()> {
    let input = bmi::BmiInput {
        weight_kg: positive_arg("weight", weight)?,
        height_cm: positive_arg("height", height)?,
        variant: if bmi_only {
            bmi::BmiVariant::BmiOnly
        } else {
            bmi::BmiVariant::WithBodySurface
        },
    };

    let result = bmi::calculate(&input).ok_or_else(not_computable)?;
    display_result(&result);
    finish(data_dir, &result, dry_run);
    Ok(())
}

fn cmd_insulin(data_dir: &Path, units: &str, syringe: &str, dry_run: bool) -> Result<()> {
    let syringe = catalog::find_syringe(syringe)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown syringe: {}", syringe)))?;
    let input = insulin::InsulinInput {
        units: positive_arg("units", units)?,
        syringe: *syringe,
    };

    let dose = insulin::calculate(&input).ok_or_else(not_computable)?;
    display_result(&dose);
    println!("  Syringe fill: {:.0}%", dose.fill_percentage);
    let marks: Vec<String> = syringe
        .graduation_marks()
        .iter()
        .map(|mark| mark.to_string())
        .collect();
    println!("  Graduations (UI): {}", marks.join(", "));
    if let Some(warning) = dose.warning() {
        println!("  ⚠ {}", warning);
    }
    finish(data_dir, &dose, dry_run);
    Ok(())
}

fn cmd_heparin(
    data_dir: &Path,
    weight: &str,
    protocol: &str,
    concentration: Option<&str>,
    dry_run: bool,
) -> Result<()> {
    let protocol = catalog::find_heparin_protocol(protocol)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown protocol: {}", protocol)))?;
    let input = heparin::HeparinInput {
        weight_kg: positive_arg("weight", weight)?,
        protocol: *protocol,
        custom_concentration: concentration
            .map(|raw| positive_arg("concentration", raw))
            .transpose()?,
    };

    let dose = heparin::calculate(&input).ok_or_else(not_computable)?;
    display_result(&dose);
    finish(data_dir, &dose, dry_run);
    Ok(())
}

fn cmd_oxygen(data_dir: &Path, cylinder: &str, pressure: &str, flow: &str, dry_run: bool) -> Result<()> {
    let cylinder = catalog::find_cylinder(cylinder)
        .ok_or_else(|| Error::InvalidInput(format!("Unknown cylinder: {}", cylinder)))?;
    let input = oxygen::OxygenInput {
        cylinder: *cylinder,
        pressure_psi: positive_arg("pressure", pressure)?,
        flow_rate: positive_arg("flow", flow)?,
    };

    let duration = oxygen::calculate(&input).ok_or_else(not_computable)?;
    display_result(&duration);
    finish(data_dir, &duration, dry_run);
    Ok(())
}

fn cmd_due_date(data_dir: &Path, lmp: &str, dry_run: bool) -> Result<()> {
    let last_period = fields::date(lmp)
        .ok_or_else(|| Error::InvalidInput(format!("--lmp must be a YYYY-MM-DD date, got '{}'", lmp)))?;

    let result = gestation::calculate(last_period, &SystemClock).ok_or_else(|| {
        Error::InvalidInput("The last menstrual period cannot be in the future".into())
    })?;
    display_result(&result);
    println!("  Progress: {:.0}%", result.progress * 100.0);
    if result.due_date_reached() {
        println!("  Due date reached");
    } else {
        println!("  Days remaining: {}", result.days_remaining);
    }
    finish(data_dir, &result, dry_run);
    Ok(())
}

fn cmd_glasgow(
    data_dir: &Path,
    eye: Option<u8>,
    verbal: Option<u8>,
    motor: Option<u8>,
    dry_run: bool,
) -> Result<()> {
    let mut assessment = glasgow::GlasgowAssessment::new();
    if let Some(score) = eye {
        assessment.select_eye(
            glasgow::EyeOpening::from_score(score)
                .ok_or_else(|| score_error("eye", score, 4))?,
        );
    }
    if let Some(score) = verbal {
        assessment.select_verbal(
            glasgow::VerbalResponse::from_score(score)
                .ok_or_else(|| score_error("verbal", score, 5))?,
        );
    }
    if let Some(score) = motor {
        assessment.select_motor(
            glasgow::MotorResponse::from_score(score)
                .ok_or_else(|| score_error("motor", score, 6))?,
        );
    }

    let Some(score) = glasgow::calculate(&assessment) else {
        let missing: Vec<&str> = [
            ("--eye", assessment.eye.is_none()),
            ("--verbal", assessment.verbal.is_none()),
            ("--motor", assessment.motor.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, missing)| missing.then_some(name))
        .collect();
        return Err(Error::InvalidInput(format!(
            "Assessment incomplete, missing {}",
            missing.join(", ")
        )));
    };

    display_result(&score);
    println!("  E{} V{} M{}", score.eye.score(), score.verbal.score(), score.motor.score());
    println!("  {}", score.severity.description());
    finish(data_dir, &score, dry_run);
    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> Result<()> {
    let path = Config::default_config_path();

    if init {
        if path.exists() {
            println!("Config file already exists at {}", path.display());
        } else {
            config.save()?;
            println!("✓ Wrote config to {}", path.display());
        }
    } else if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("Config file: {} (not created, using defaults)", path.display());
    }

    println!("  data_dir = {}", config.data.data_dir.display());
    println!("  level    = {}", config.logging.level);
    Ok(())
}

fn cmd_history(data_dir: &Path, action: HistoryAction) -> Result<()> {
    let mut history = open_history(data_dir);

    match action {
        HistoryAction::List { calculator_type } => {
            let entries: Vec<&HistoryEntry> = match calculator_type {
                Some(raw) => {
                    let kind: CalculatorKind = raw.parse()?;
                    history.query_by_type(kind)
                }
                None => history.entries().iter().collect(),
            };

            if entries.is_empty() {
                println!("No saved calculations.");
                return Ok(());
            }

            for entry in entries {
                println!(
                    "{}  {} ({})",
                    entry.id,
                    entry.calculator_name,
                    history.describe_age(entry)
                );
                println!("    {}", entry.result);
            }
        }
        HistoryAction::Remove { id } => {
            if history.get(&id).is_none() {
                println!("No saved calculation with id {}", id);
                return Ok(());
            }
            history.remove(&id);
            println!("✓ Removed {}", id);
        }
        HistoryAction::Clear => {
            let count = history.len();
            history.clear();
            println!("✓ Cleared {} saved calculations", count);
        }
    }

    Ok(())
}

fn open_history(data_dir: &Path) -> HistoryStore<FileStorage> {
    HistoryStore::open(FileStorage::new(data_dir))
}

fn display_result(output: &impl Recordable) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", output.calculator_name());
    println!("╰─────────────────────────────────────────╯");
    match output.result() {
        CalculationResult::Scalar(value) => println!("  {}", value),
        CalculationResult::Labeled(pairs) => {
            for (label, value) in pairs {
                println!("  {}: {}", label, value);
            }
        }
    }
}

fn finish(data_dir: &Path, output: &impl Recordable, dry_run: bool) {
    if dry_run {
        println!("\n[Dry run - not saved to history]");
        return;
    }

    let mut history = open_history(data_dir);
    let entry = history.record(output);
    if history.last_save_succeeded() {
        println!("\n✓ Saved to history ({})", entry.id);
    } else {
        println!(
            "\n⚠ Not saved to history: could not write to {}",
            history.storage().dir().display()
        );
    }
}

fn positive_arg(name: &str, raw: &str) -> Result<f64> {
    fields::positive(raw).ok_or_else(|| {
        Error::InvalidInput(format!(
            "--{} must be a number greater than zero, got '{}'",
            name, raw
        ))
    })
}

/// `DESCRIPTION=ML`, split on the last `=`
fn fluid_entry_arg(name: &str, raw: &str) -> Result<(String, f64)> {
    let (description, volume) = raw.rsplit_once('=').ok_or_else(|| {
        Error::InvalidInput(format!("--{} must look like DESCRIPTION=ML, got '{}'", name, raw))
    })?;
    Ok((description.trim().to_string(), positive_arg(name, volume)?))
}

fn score_error(name: &str, score: u8, max: u8) -> Error {
    Error::InvalidInput(format!("--{} must be between 1 and {}, got {}", name, max, score))
}

fn not_computable() -> Error {
    Error::InvalidInput("Not enough valid input to calculate a result".into())
}
