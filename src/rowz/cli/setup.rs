use clap::{CommandFactory, Parser, Subcommand};

/// "0.3.2" for releases, "0.3.2@abc1234" for builds between tags.
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("ROWZ_GIT_HASH");
    const IS_RELEASE: &str = env!("ROWZ_IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{}", VERSION, GIT_HASH)
        }
    })
}

#[derive(Parser, Debug)]
#[command(
    name = "rowz",
    bin_name = "rowz",
    version = get_version(),
    disable_help_flag = true,
    disable_help_subcommand = true
)]
#[command(about = "Manage records in CSV files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Field delimiter for this run (e.g. ";", "tab")
    #[arg(short, long, global = true, help_heading = "Options")]
    pub delimiter: Option<String>,

    /// Print records as JSON
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, help_heading = "Options")]
    pub no_color: bool,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,

    /// Print help
    #[arg(short, long, global = true)]
    pub help: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandGroup {
    Record,
    File,
    Misc,
}

impl CommandGroup {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandGroup::Record => "Record Commands:",
            CommandGroup::File => "File Commands:",
            CommandGroup::Misc => "Miscellaneous:",
        }
    }

    pub fn for_command(name: &str) -> Option<Self> {
        match name {
            "list" | "add" | "delete" | "modify" => Some(CommandGroup::Record),
            "new" | "files" | "info" => Some(CommandGroup::File),
            "shell" | "config" | "help" => Some(CommandGroup::Misc),
            _ => None,
        }
    }

    pub fn all() -> &'static [CommandGroup] {
        &[CommandGroup::Record, CommandGroup::File, CommandGroup::Misc]
    }
}

pub fn get_grouped_help() -> String {
    let cmd = Cli::command();
    let version = cmd.get_version().unwrap_or("unknown");

    let mut output = String::new();
    output.push_str(&format!("rowz {version}\n"));
    output.push_str("Manage records in CSV files\n");
    output.push('\n');
    output.push_str("Usage: rowz [OPTIONS] [COMMAND]\n");

    let subcommands: Vec<_> = cmd.get_subcommands().collect();

    for group in CommandGroup::all() {
        let group_cmds: Vec<_> = subcommands
            .iter()
            .filter(|sc| {
                !sc.is_hide_set() && CommandGroup::for_command(sc.get_name()) == Some(*group)
            })
            .collect();

        if !group_cmds.is_empty() {
            output.push('\n');
            output.push_str(&format!("{}\n", group.heading()));
            for sc in group_cmds {
                let name = sc.get_name();
                let about = sc.get_about().map(|s| s.to_string()).unwrap_or_default();
                output.push_str(&format!("  {:<12} {}\n", name, about));
            }
        }
    }

    output.push('\n');
    output.push_str("Options:\n");
    output.push_str("  -d, --delimiter <C>  Field delimiter for this run\n");
    output.push_str("      --json           Print records as JSON\n");
    output.push_str("      --no-color       Disable colored output\n");
    output.push_str("  -v, --verbose        Verbose output\n");
    output.push_str("  -h, --help           Print help\n");
    output.push_str("  -V, --version        Print version\n");

    output
}

pub fn print_grouped_help() {
    print!("{}", get_grouped_help());
}

/// Prints help for the subcommand the user typed, or the grouped help without one.
pub fn print_subcommand_help(command: &Option<Commands>) {
    let subcommand_name = match command {
        Some(Commands::Record(c)) => match c {
            RecordCommands::List { .. } => "list",
            RecordCommands::Add { .. } => "add",
            RecordCommands::Delete { .. } => "delete",
            RecordCommands::Modify { .. } => "modify",
        },
        Some(Commands::File(c)) => match c {
            FileCommands::New { .. } => "new",
            FileCommands::Files { .. } => "files",
            FileCommands::Info { .. } => "info",
        },
        Some(Commands::Misc(c)) => match c {
            MiscCommands::Shell { .. } => "shell",
            MiscCommands::Config { .. } => "config",
            MiscCommands::Help { .. } => "help",
        },
        None => {
            print_grouped_help();
            return;
        }
    };

    print_help_for_command(subcommand_name);
}

pub fn print_help_for_command(name: &str) {
    let mut cmd = Cli::command();

    for subcmd in cmd.get_subcommands_mut() {
        if subcmd.get_name() == name {
            let help = subcmd.render_help();
            print!("{}", help);
            return;
        }
    }

    eprintln!("Unknown command: {}", name);
    eprintln!();
    print_grouped_help();
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(flatten)]
    Record(RecordCommands),

    #[command(flatten)]
    File(FileCommands),

    #[command(flatten)]
    Misc(MiscCommands),
}

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List the records of a file
    #[command(alias = "ls", display_order = 1)]
    List {
        /// File to read
        file: String,
    },

    /// Append a record
    #[command(alias = "a", display_order = 2)]
    Add {
        /// File to append to (created with these fields if missing)
        file: String,

        /// Values as field=value pairs
        #[arg(required = true, num_args = 1..)]
        values: Vec<String>,
    },

    /// Delete records by number
    #[command(alias = "rm", display_order = 3)]
    Delete {
        /// File to delete from
        file: String,

        /// Record numbers as listed (e.g. 1 3 5-7)
        #[arg(required = true, num_args = 1..)]
        numbers: Vec<String>,
    },

    /// Change one field of a record
    #[command(alias = "m", display_order = 4)]
    Modify {
        /// File holding the record
        file: String,

        /// Record number as listed
        number: String,

        /// Field to change
        field: String,

        /// New value
        value: String,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Create a file with the given fields
    #[command(display_order = 10)]
    New {
        /// File name (the configured extension is added when missing)
        file: String,

        /// Field names (e.g. id name or id,name)
        #[arg(required = true, num_args = 1..)]
        fields: Vec<String>,

        /// Replace an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// List data files in a directory
    #[command(display_order = 11)]
    Files {
        /// Directory to look in (defaults to the current one)
        dir: Option<String>,
    },

    /// Show fields, record count, size and modification time of a file
    #[command(display_order = 12)]
    Info {
        /// File to inspect
        file: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum MiscCommands {
    /// Start the interactive shell
    #[command(display_order = 20)]
    Shell {
        /// File to open on start
        file: Option<String>,
    },

    /// Get or set configuration
    #[command(display_order = 21)]
    Config {
        /// Configuration key (delimiter, file-ext, atomic-writes)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },

    /// Print help for rowz or a subcommand
    #[command(display_order = 22)]
    Help {
        /// Subcommand to get help for
        command: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add_with_global_flags() {
        let cli = Cli::parse_from(["rowz", "add", "people.csv", "id=1", "name=Ana", "-d", ";"]);
        assert_eq!(cli.delimiter.as_deref(), Some(";"));
        match cli.command {
            Some(Commands::Record(RecordCommands::Add { file, values })) => {
                assert_eq!(file, "people.csv");
                assert_eq!(values, vec!["id=1", "name=Ana"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_aliases() {
        let cli = Cli::parse_from(["rowz", "rm", "people.csv", "2-3"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Record(RecordCommands::Delete { .. }))
        ));

        let cli = Cli::parse_from(["rowz", "ls", "people.csv", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn test_modify_requires_all_parts() {
        assert!(Cli::try_parse_from(["rowz", "modify", "people.csv", "1", "name"]).is_err());
        let cli = Cli::parse_from(["rowz", "modify", "people.csv", "1", "name", "Bea", "--yes"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Record(RecordCommands::Modify { yes: true, .. }))
        ));
    }

    #[test]
    fn test_grouped_help_lists_every_command() {
        let help = get_grouped_help();
        for name in [
            "list", "add", "delete", "modify", "new", "files", "info", "shell", "config",
        ] {
            assert!(help.contains(&format!("  {:<12}", name)), "missing {}", name);
        }
        assert!(help.contains("Record Commands:"));
    }
}
