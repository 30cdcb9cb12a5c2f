//! Pull records from an OpenMRS server into the local index and query them.
//!
//! Usage:
//!   clinic-sync download-patients --name Jan
//!   clinic-sync patients --name Ja
//!   clinic-sync observations --patient <uuid> --term malaria
//!
//! Records are printed as one JSON object per line.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clinic_service::{ClinicServices, ServiceConfig};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clinic-sync")]
#[command(about = "Download and query offline clinical records")]
struct Args {
    /// JSON config file; CLINIC_* environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local index path
    #[arg(long)]
    db: Option<PathBuf>,

    /// Server base url, e.g. http://localhost:8081/openmrs
    #[arg(long)]
    server: Option<String>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download one patient by uuid
    DownloadPatient {
        #[arg(long)]
        uuid: String,
    },
    /// Download patients matching a name
    DownloadPatients {
        #[arg(long)]
        name: String,
    },
    /// List stored patients, optionally by name prefix
    Patients {
        #[arg(long, default_value = "")]
        name: String,
        /// Print the one-line summary instead of the record
        #[arg(long)]
        summary: bool,
    },
    /// Full-text search over stored patients
    SearchPatients { term: String },
    /// Download forms matching a name
    DownloadForms {
        #[arg(long)]
        name: String,
    },
    /// List stored forms
    Forms,
    /// List (downloading first with --download) the templates of a form
    FormTemplates {
        #[arg(long)]
        form: String,
        #[arg(long)]
        download: bool,
    },
    /// Download (with --download) and list a patient's observations
    Observations {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        term: Option<String>,
        #[arg(long)]
        download: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let cfg = load_config(&args)?;
    info!(?cfg, "configuration");
    let services = ClinicServices::open(&cfg).context("opening clinic services")?;
    run(&services, args.command)
}

fn load_config(args: &Args) -> Result<ServiceConfig> {
    let mut cfg = match &args.config {
        Some(path) => ServiceConfig::from_file(path)?,
        None => ServiceConfig::default(),
    }
    .with_env();
    if let Some(db) = &args.db {
        cfg.db_path = db.clone();
    }
    let username = args.username.clone().unwrap_or_else(|| cfg.username.clone());
    let password = args.password.clone().unwrap_or_else(|| cfg.password.clone());
    let server = args.server.clone().unwrap_or_else(|| cfg.server.clone());
    cfg.configure(&username, &password, &server);
    Ok(cfg)
}

fn run(services: &ClinicServices, command: Command) -> Result<()> {
    match command {
        Command::DownloadPatient { uuid } => {
            let patient = services.patients.download_patient_by_uuid(&uuid)?;
            print_lines(patient.iter())
        }
        Command::DownloadPatients { name } => print_lines(&services.patients.download_patients_by_name(&name)?),
        Command::Patients { name, summary } => {
            let patients = services.patients.get_patients_by_name(&name)?;
            if summary {
                print_lines(patients.iter().map(|p| p.summary()))
            } else {
                print_lines(&patients)
            }
        }
        Command::SearchPatients { term } => print_lines(&services.patients.search_patients(&term)?),
        Command::DownloadForms { name } => print_lines(&services.forms.download_forms_by_name(&name)?),
        Command::Forms => print_lines(&services.forms.get_all_forms()?),
        Command::FormTemplates { form, download } => {
            if download {
                let n = services.forms.download_form_templates(&form)?.len();
                info!(form = %form, downloaded = n, "form templates downloaded");
            }
            print_lines(&services.forms.get_form_templates_by_form(&form)?)
        }
        Command::Observations { patient, term, download } => {
            if download {
                let n = services.observations.download_observations_by_patient(&patient)?.len();
                info!(patient = %patient, downloaded = n, "observations downloaded");
            }
            let found = match term {
                Some(t) => services.observations.search_observations(&patient, &t)?,
                None => services.observations.get_observations_by_patient(&patient)?,
            };
            print_lines(&found)
        }
    }
}

fn print_lines<I>(items: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: Serialize,
{
    let stdout = io::stdout();
    write_lines(&mut stdout.lock(), items)
}

/// One compact JSON value per line.
fn write_lines<W, I>(out: &mut W, items: I) -> Result<()>
where
    W: Write,
    I: IntoIterator,
    I::Item: Serialize,
{
    for item in items {
        writeln!(out, "{}", serde_json::to_string(&item)?)?;
    }
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_model::{Patient, PatientIdentifier};
    use pretty_assertions::assert_eq;

    fn lines(buf: &[u8]) -> Vec<String> {
        String::from_utf8(buf.to_vec()).expect("utf-8").lines().map(str::to_string).collect()
    }

    #[test]
    fn records_are_written_one_json_object_per_line() {
        let patients = vec![Patient::new("p1", "Jane", "Doe"), Patient::new("p2", "Bob", "Smith")];
        let mut buf = Vec::new();
        write_lines(&mut buf, &patients).expect("write");

        let written = lines(&buf);
        assert_eq!(written.len(), 2);
        let decoded: Vec<Patient> =
            written.iter().map(|l| serde_json::from_str(l).expect("one object per line")).collect();
        assert_eq!(decoded, patients);
    }

    #[test]
    fn summaries_are_written_as_json_strings() {
        let mut jane = Patient::new("p1", "Jane", "Doe");
        jane.gender = "F".into();
        jane.identifiers.push(PatientIdentifier::new("OpenMRS ID", "100-1"));
        let mut buf = Vec::new();
        write_lines(&mut buf, [jane.summary()]).expect("write");

        assert_eq!(lines(&buf), vec!["\"♀ Doe, J, 100-1\"".to_string()]);
    }

    #[test]
    fn nothing_to_write_leaves_output_empty() {
        let mut buf = Vec::new();
        write_lines(&mut buf, Vec::<Patient>::new()).expect("write");
        assert!(buf.is_empty());
    }
}
