//! Command dispatch: maps parsed arguments onto services.

use std::fmt::Display;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};
use tracing::{debug, instrument};

use crate::application::services::{CatalogService, LoadReport};
use crate::application::{ApplicationError, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::shell::Shell;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::InfraError;
use crate::util::path::expand_path;

/// Run a command against the process's stdout and stderr.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    execute_command_with(cli, &mut stdout.lock(), &mut stderr.lock())
}

/// Run a command, writing data to `out` and warnings to `err`.
pub fn execute_command_with(
    cli: &Cli,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    if let Some(Commands::Completion { shell }) = &cli.command {
        return cmd_completion(*shell, out);
    }

    let local_dir = cli
        .project_dir
        .clone()
        .or_else(|| std::env::current_dir().ok());
    let settings = Settings::load(local_dir.as_deref())?;
    let container = ServiceContainer::new(settings);
    let data_file = cli
        .file
        .as_deref()
        .map(expand_path)
        .unwrap_or_else(|| container.settings.data_file.clone());
    debug!("data_file: {}", data_file.display());

    match &cli.command {
        None | Some(Commands::Menu) => cmd_menu(&container, data_file, out),
        Some(Commands::List) => cmd_list(&container, &data_file, out, err),
        Some(Commands::Show { course }) => cmd_show(&container, &data_file, course, out, err),
        Some(Commands::Check) => cmd_check(&container, &data_file, out),
        Some(Commands::Tree) => cmd_tree(&container, &data_file, out, err),
        Some(Commands::Config { command }) => {
            cmd_config(&container, command, local_dir.as_deref(), out)
        }
        Some(Commands::Completion { shell }) => cmd_completion(*shell, out),
    }
}

fn emit(out: &mut dyn Write, line: impl Display) -> CliResult<()> {
    writeln!(out, "{line}").map_err(|e| InfraError::io("write command output", e).into())
}

/// Load the catalog for a one-shot command, warning about skipped lines.
fn load_catalog(
    container: &ServiceContainer,
    data_file: &Path,
    err: &mut dyn Write,
) -> CliResult<(CatalogService, LoadReport)> {
    let mut service = container.catalog_service();
    let report = service.load(data_file)?;
    for skipped in &report.skipped {
        emit(err, output::warning_text(&format!("invalid format, {skipped}")))?;
    }
    Ok((service, report))
}

#[instrument(skip(container, out))]
fn cmd_menu(container: &ServiceContainer, data_file: PathBuf, out: &mut dyn Write) -> CliResult<()> {
    let stdin = io::stdin();
    let mut shell = Shell::new(
        stdin.lock(),
        BufWriter::new(out),
        container.catalog_service(),
        data_file,
        container.settings.show_timing,
    );
    shell.run()
}

#[instrument(skip(container, out, err))]
fn cmd_list(
    container: &ServiceContainer,
    data_file: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    let (service, _) = load_catalog(container, data_file, err)?;
    emit(out, output::header_text("Course List:"))?;
    for course in service.courses()? {
        emit(out, course)?;
    }
    Ok(())
}

#[instrument(skip(container, out, err))]
fn cmd_show(
    container: &ServiceContainer,
    data_file: &Path,
    course: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    let (service, _) = load_catalog(container, data_file, err)?;
    match service.find(course.trim())? {
        Some(record) => emit(out, output::course_detail_text(record)),
        None => Err(CliError::CourseNotFound(course.to_string())),
    }
}

/// Report every skipped line and dropped prerequisite exactly once.
#[instrument(skip(container, out))]
fn cmd_check(container: &ServiceContainer, data_file: &Path, out: &mut dyn Write) -> CliResult<()> {
    let report = container.catalog_service().load(data_file)?;

    emit(
        out,
        output::success_text(&format!(
            "{} courses loaded from {} in {:.3}ms",
            report.loaded,
            data_file.display(),
            report.elapsed.as_secs_f64() * 1000.0
        )),
    )?;
    for skipped in &report.skipped {
        emit(out, output::failure_item_text(&format!("skipped {skipped}")))?;
    }
    for dropped in &report.dropped {
        emit(out, output::failure_item_text(&format!("unknown prerequisite {dropped}")))?;
    }

    if report.is_clean() {
        Ok(())
    } else {
        Err(CliError::DataIssues {
            skipped: report.skipped.len(),
            dropped: report.dropped.len(),
        })
    }
}

#[instrument(skip(container, out, err))]
fn cmd_tree(
    container: &ServiceContainer,
    data_file: &Path,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> CliResult<()> {
    let (service, _) = load_catalog(container, data_file, err)?;
    let catalog = service.catalog();
    emit(
        out,
        output::header_text(&format!(
            "{} courses, height {}",
            catalog.len(),
            catalog.height()
        )),
    )?;
    write!(out, "{}", catalog.shape()).map_err(|e| InfraError::io("write tree", e))?;
    Ok(())
}

#[instrument(skip(container, out))]
fn cmd_config(
    container: &ServiceContainer,
    command: &ConfigCommands,
    local_dir: Option<&Path>,
    out: &mut dyn Write,
) -> CliResult<()> {
    match command {
        ConfigCommands::Show => emit(out, container.settings.to_toml()?),
        ConfigCommands::Path => {
            let global = global_config_path();
            let local = local_dir.map(local_config_path);
            for (label, path) in [("global", global), ("local", local)] {
                match path {
                    Some(path) => {
                        let state = if container.fs.exists(&path) {
                            "exists"
                        } else {
                            "not found"
                        };
                        emit(out, format!("{label}: {} ({state})", path.display()))?;
                    }
                    None => emit(out, format!("{label}: (unavailable)"))?,
                }
            }
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| ApplicationError::Config {
                message: "cannot determine config directory".into(),
            })?;
            if container.fs.exists(&path) && !force {
                return Err(CliError::InvalidArgs(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                container
                    .fs
                    .create_dir_all(dir)
                    .with_path_context("create config dir", dir)?;
            }
            container
                .fs
                .write(&path, &Settings::template())
                .with_path_context("write config template", &path)?;
            emit(out, output::success_text(&format!("Created {}", path.display())))
        }
    }
}

fn cmd_completion(shell: CompletionShell, out: &mut dyn Write) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}
