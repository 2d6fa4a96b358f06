//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `syllabus_core` wiring: config, logging, storage bootstrap.
//! - Print a deterministic per-entity row summary of the configured store.

use log::info;
use std::error::Error;
use std::process::ExitCode;
use syllabus_core::{
    AppConfig, DocumentTemplate, Entity, EntityRepository, Session, Subject, Syllabus, Teacher,
};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("syllabus_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    println!("syllabus_core ping={}", syllabus_core::ping());
    println!("syllabus_core version={}", syllabus_core::core_version());

    let config = AppConfig::from_env()?;
    let logging_enabled = config.init_logging()?;
    println!("logging enabled={logging_enabled} level={}", config.log_level);

    let conn = config.open_db()?;
    let session = Session::try_new(&conn)?;
    print_count::<Teacher>(&session)?;
    print_count::<Subject>(&session)?;
    print_count::<Syllabus>(&session)?;
    print_count::<DocumentTemplate>(&session)?;

    info!("event=cli_summary module=cli status=ok");
    Ok(())
}

fn print_count<T: Entity>(session: &Session<'_>) -> Result<(), Box<dyn Error>> {
    let rows = session.repository::<T>().get_all()?.len();
    println!("{}={rows}", T::TABLE);
    Ok(())
}
