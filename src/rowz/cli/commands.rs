use super::prompt::ask_yes_no;
use super::render::{
    render_display_records, render_info, render_json, render_messages, render_pairs,
    render_text_list,
};
use super::setup::{
    print_grouped_help, print_help_for_command, print_subcommand_help, Cli, Commands,
    FileCommands, MiscCommands, RecordCommands,
};
use super::shell::Shell;
use super::theme::detect_color;
use clap::Parser;
use directories::ProjectDirs;
use log::{debug, warn};
use rowz::api::{CmdResult, ConfigAction, RowzApi, RowzPaths};
use rowz::config::{parse_delimiter, RowzConfig};
use rowz::error::{Result, RowzError};
use rowz::model::Record;
use rowz::session::Session;
use rowz::store::fs::CsvStore;
use std::io;
use std::path::{Path, PathBuf};

/// Overrides where `config.json` is looked up.
pub const CONFIG_DIR_ENV: &str = "ROWZ_CONFIG_DIR";

struct AppContext {
    api: RowzApi<CsvStore>,
    use_color: bool,
    json: bool,
}

/// Parses arguments and runs one command. `Ok(false)` means the command reported failure.
pub fn run() -> Result<bool> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.help {
        if cli.command.is_none() {
            print_grouped_help();
        } else {
            print_subcommand_help(&cli.command);
        }
        return Ok(true);
    }

    let mut ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Record(cmd)) => match cmd {
            RecordCommands::List { file } => handle_list(&ctx, &file),
            RecordCommands::Add { file, values } => handle_add(&mut ctx, &file, &values),
            RecordCommands::Delete { file, numbers } => handle_delete(&mut ctx, &file, &numbers),
            RecordCommands::Modify {
                file,
                number,
                field,
                value,
                yes,
            } => handle_modify(&mut ctx, &file, &number, &field, &value, yes),
        },
        Some(Commands::File(cmd)) => match cmd {
            FileCommands::New {
                file,
                fields,
                force,
            } => handle_new(&mut ctx, &file, &fields, force),
            FileCommands::Files { dir } => handle_files(&ctx, dir),
            FileCommands::Info { file } => handle_info(&ctx, &file),
        },
        Some(Commands::Misc(cmd)) => match cmd {
            MiscCommands::Shell { file } => handle_shell(&mut ctx, file),
            MiscCommands::Config { key, value } => handle_config(&ctx, key, value),
            MiscCommands::Help { command } => handle_help(command),
        },
        None => {
            print_grouped_help();
            Ok(true)
        }
    }
}

/// Diagnostics already reach the user as messages, so only errors are logged by
/// default. `-v` turns on debug output; `RUST_LOG` still wins when set.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "error" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "rowz", "rowz")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            RowzError::Api(format!(
                "Could not determine a config directory; set {}",
                CONFIG_DIR_ENV
            ))
        })
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let config_dir = config_dir()?;
    let mut config = RowzConfig::load(&config_dir).unwrap_or_else(|err| {
        warn!("ignoring unreadable config in {}: {}", config_dir.display(), err);
        RowzConfig::default()
    });

    if let Some(delimiter) = &cli.delimiter {
        config.delimiter = parse_delimiter(delimiter).map_err(RowzError::Api)?;
    }
    debug!("config: {:?}", config);

    let store = CsvStore::new()
        .with_delimiter(config.delimiter_byte())
        .with_atomic_writes(config.atomic_writes);
    let paths = RowzPaths { config_dir };

    Ok(AppContext {
        api: RowzApi::new(store, paths, config),
        use_color: !cli.no_color && detect_color(),
        json: cli.json,
    })
}

/// Prints the result's messages and reports whether it succeeded.
fn finish(ctx: &AppContext, result: &CmdResult) -> Result<bool> {
    print!("{}", render_messages(&result.messages, ctx.use_color));
    Ok(result.success)
}

fn handle_list(ctx: &AppContext, file: &str) -> Result<bool> {
    let result = ctx.api.load(Path::new(file));

    if ctx.json {
        print!("{}", render_json(&result.records)?);
        for message in &result.messages {
            eprintln!("{}", message.content);
        }
        return Ok(result.success);
    }

    if let Some(fields) = &result.fields {
        print!(
            "{}",
            render_display_records(fields, &result.records, ctx.use_color)
        );
    }
    finish(ctx, &result)
}

fn handle_add(ctx: &mut AppContext, file: &str, values: &[String]) -> Result<bool> {
    let record = Record::parse_assignments(values)?;
    let result = ctx.api.append(Path::new(file), &record);
    finish(ctx, &result)
}

fn handle_delete(ctx: &mut AppContext, file: &str, numbers: &[String]) -> Result<bool> {
    let result = ctx.api.delete_selected(Path::new(file), numbers);
    finish(ctx, &result)
}

/// Goes through a [`Session`] so the confirmation cannot be given for a row that
/// changed while the question was on screen.
fn handle_modify(
    ctx: &mut AppContext,
    file: &str,
    number: &str,
    field: &str,
    value: &str,
    yes: bool,
) -> Result<bool> {
    let mut session = Session::new();
    let opened = session.open(&ctx.api, Path::new(file));
    if !opened.success || session.fields().is_none() {
        finish(ctx, &opened)?;
        return Ok(false);
    }

    let id = match session.select(&[number]) {
        Ok(ids) if ids.len() == 1 => ids[0],
        Ok(_) => return Err(RowzError::Api("modify takes a single record number".into())),
        Err(err) => return Err(err),
    };

    let known_field = session.fields().is_some_and(|f| f.contains(field));
    if !yes && known_field {
        let old = session
            .row(id)
            .and_then(|row| row.record.get(field))
            .unwrap_or_default()
            .to_string();
        let question = format!("Change: {} = '{}' -> '{}'?", field, old, value);
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        if !ask_yes_no(&mut input, &mut output, &question)? {
            println!("Cancelled");
            return Ok(true);
        }
    }

    let result = session.modify_field(&mut ctx.api, id, field, value);
    finish(ctx, &result)
}

fn handle_new(ctx: &mut AppContext, file: &str, fields: &[String], force: bool) -> Result<bool> {
    let fields: Vec<&str> = fields
        .iter()
        .flat_map(|f| f.split(','))
        .filter(|f| !f.trim().is_empty())
        .collect();
    let result = ctx.api.create_file(Path::new(file), &fields, force);
    finish(ctx, &result)
}

fn handle_files(ctx: &AppContext, dir: Option<String>) -> Result<bool> {
    let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let result = ctx.api.list_files(&dir);
    if !result.files.is_empty() {
        let lines: Vec<String> = result
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        print!("{}", render_text_list(&lines, "", ctx.use_color));
    }
    finish(ctx, &result)
}

fn handle_info(ctx: &AppContext, file: &str) -> Result<bool> {
    let result = ctx.api.info(Path::new(file));
    if let Some(stats) = &result.stats {
        if ctx.json {
            println!("{}", serde_json::to_string_pretty(stats)?);
        } else {
            print!("{}", render_info(stats, ctx.use_color));
        }
    }
    finish(ctx, &result)
}

fn handle_shell(ctx: &mut AppContext, file: Option<String>) -> Result<bool> {
    let stdin = io::stdin();
    let input = stdin.lock();
    let output = io::stdout();
    let use_color = ctx.use_color;

    let mut shell = Shell::new(&mut ctx.api, input, output, use_color);
    shell.run(file.as_deref().map(Path::new))?;
    Ok(true)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<bool> {
    let show_all = key.is_none();
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };

    let result = ctx.api.config(action);
    if show_all {
        if let Some(config) = &result.config {
            print!("{}", render_pairs(&config.entries(), ctx.use_color));
        }
    }
    finish(ctx, &result)
}

fn handle_help(command: Option<String>) -> Result<bool> {
    match command {
        Some(cmd) => print_help_for_command(&cmd),
        None => print_grouped_help(),
    }
    Ok(true)
}
