use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use triage_core::constants::{DEFAULT_HISTORY_LIMIT, DEFAULT_HISTORY_TIMEOUT_MS};
use triage_core::{
    fiscal_code, service::today, MotiveText, RawVitalSigns, RuleEngine, RuleSuggestion,
    RuleTable, TriageConfig, TriageInput, TriageResult, TriageService,
};

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Emergency-room triage priority suggestion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate the priority code from the rule table alone
    Estimate {
        #[command(flatten)]
        intake: IntakeArgs,
    },
    /// Suggest a priority code using the rules and a JSON history file
    Suggest {
        #[command(flatten)]
        intake: IntakeArgs,
        /// JSON array of recorded emergencies
        #[arg(long)]
        history_file: PathBuf,
        /// Number of recent emergencies to compare against
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: usize,
    },
    /// Decode age and gender from a fiscal code
    DecodeFiscalCode {
        /// Fiscal code (codice fiscale)
        code: String,
        /// Reference day for the age (YYYY-MM-DD, default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Print the built-in rule table as JSON
    Rules,
}

#[derive(Args)]
struct IntakeArgs {
    /// Access motive (at least 3 characters)
    motive: String,
    /// Fiscal code used to derive the patient's age
    #[arg(long)]
    fiscal_code: Option<String>,
    /// Blood pressure, e.g. "120/80"
    #[arg(long)]
    blood_pressure: Option<String>,
    /// Body temperature in Celsius
    #[arg(long)]
    temperature: Option<String>,
    /// Heart rate in bpm
    #[arg(long)]
    heart_rate: Option<String>,
    /// Oxygen saturation in percent
    #[arg(long)]
    saturation: Option<String>,
    /// Reference day for the age (YYYY-MM-DD, default: today)
    #[arg(long)]
    today: Option<NaiveDate>,
    /// Rule table exported by the server (GET /triage/rules)
    #[arg(long)]
    rules: Option<PathBuf>,
    /// Print the result as JSON
    #[arg(long)]
    json: bool,
}

impl IntakeArgs {
    fn input(&self) -> anyhow::Result<TriageInput> {
        let motive = MotiveText::new(&self.motive).context("invalid motive")?;
        let vitals = RawVitalSigns {
            blood_pressure: self.blood_pressure.clone(),
            body_temperature: self.temperature.clone(),
            heart_rate: self.heart_rate.clone(),
            oxygen_saturation: self.saturation.clone(),
        };
        Ok(TriageInput::new(motive, self.fiscal_code.clone(), &vitals))
    }

    fn engine(&self) -> anyhow::Result<RuleEngine> {
        match &self.rules {
            Some(path) => Ok(RuleEngine::new(load_rule_table(path)?)),
            None => Ok(RuleEngine::builtin()),
        }
    }

    fn day(&self) -> NaiveDate {
        self.today.unwrap_or_else(today)
    }
}

fn load_rule_table(path: &Path) -> anyhow::Result<RuleTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading rule table {}", path.display()))?;
    RuleTable::from_json(&json).with_context(|| format!("loading rule table {}", path.display()))
}

fn render_rules(rules: &RuleSuggestion, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(rules)?);
    }
    Ok(format!("Code: {}\nReason: {}", rules.code, rules.reason()))
}

fn render_result(result: &TriageResult, json: bool) -> anyhow::Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(result)?);
    }
    let code = result
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "none".into());
    let mut out = format!(
        "Code: {}\nReason: {}\nRule-based: {} ({})",
        code,
        result.reason,
        result.rule_based.code,
        result.rule_based.reason()
    );
    match (&result.history_based.code, &result.history_based.reason) {
        (Some(c), Some(reason)) => out.push_str(&format!("\nHistory-based: {} ({})", c, reason)),
        _ => out.push_str(&format!(
            "\nHistory-based: none ({} similar)",
            result.history_based.match_count
        )),
    }
    Ok(out)
}

fn run(command: Commands) -> anyhow::Result<String> {
    match command {
        Commands::Estimate { intake } => {
            let rules = intake.engine()?.evaluate(&intake.input()?, intake.day());
            render_rules(&rules, intake.json)
        }
        Commands::Suggest {
            intake,
            history_file,
            limit,
        } => {
            let cfg = TriageConfig::new(
                Some(history_file),
                limit,
                Duration::from_millis(DEFAULT_HISTORY_TIMEOUT_MS),
            )?;
            let service = TriageService::with_engine(intake.engine()?, &cfg, cfg.open_history());
            let result = service.suggest_at(&intake.input()?, intake.day());
            render_result(&result, intake.json)
        }
        Commands::DecodeFiscalCode { code, today: day } => {
            let day = day.unwrap_or_else(today);
            match fiscal_code::decode(&code, day) {
                Some(id) => Ok(format!(
                    "Age: {}, Gender: {:?}, Birth date: {}",
                    id.age, id.gender, id.birth_date
                )),
                None => anyhow::bail!("could not decode fiscal code: {}", code),
            }
        }
        Commands::Rules => Ok(RuleTable::builtin().to_json_pretty()?),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => println!("{}", run(command)?),
        None => println!("Use 'triage --help' for commands"),
    }

    Ok(())
}
