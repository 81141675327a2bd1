//! # Interactive Shell
//!
//! A line-oriented front end over a [`Session`]. Each line is one command; the shell
//! prompts for whatever a command needs and asks before it changes a file. After
//! every mutation the session reloads and the table is drawn again, so what the user
//! sees is always what is on disk.
//!
//! The shell is generic over its input and output so tests can script whole sessions.

use super::prompt::{ask_line, ask_yes_no};
use super::render::{render_info, render_messages, render_record, render_table, render_text_list};
use colored::Colorize;
use rowz::api::{CmdMessage, CmdResult, RowzApi};
use rowz::index::parse_number;
use rowz::model::Record;
use rowz::session::{RowId, Session};
use rowz::store::RecordStore;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

const HELP: &str = "\
Commands:
  open <file>               Open a file and list its records
  new <file> <fields...>    Create a file (fields separated by spaces or commas)
  list                      Re-read and list the current file
  show <n>                  Show one record field by field
  add                       Add a record, prompting for every field
  delete <n...>             Delete records by number (e.g. 2 4-6)
  modify <n> [field [value]]  Change one field of a record
  edit <n>                  Change any field of a record
  files [dir]               List data files
  info                      Show details of the current file
  reload                    Re-read the current file
  help                      Show this help
  quit                      Leave the shell
";

enum Flow {
    Continue,
    Quit,
}

pub struct Shell<'a, S: RecordStore, R: BufRead, W: Write> {
    api: &'a mut RowzApi<S>,
    session: Session,
    input: R,
    output: W,
    use_color: bool,
}

impl<'a, S: RecordStore, R: BufRead, W: Write> Shell<'a, S, R, W> {
    pub fn new(api: &'a mut RowzApi<S>, input: R, output: W, use_color: bool) -> Self {
        Self {
            api,
            session: Session::new(),
            input,
            output,
            use_color,
        }
    }

    #[cfg(test)]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Runs until `quit` or end of input.
    pub fn run(&mut self, initial: Option<&Path>) -> io::Result<()> {
        writeln!(self.output, "rowz shell. Type 'help' for commands.")?;
        if let Some(path) = initial {
            self.open(path)?;
        }

        loop {
            let prompt = self.prompt();
            let line = match ask_line(&mut self.input, &mut self.output, &prompt)? {
                Some(line) => line,
                None => {
                    writeln!(self.output)?;
                    break;
                }
            };
            if let Flow::Quit = self.dispatch(line.trim())? {
                break;
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        let name = self
            .session
            .path()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string());
        match (name, self.use_color) {
            (Some(name), true) => format!(
                "{}{}{} ",
                "rowz:".bold(),
                name.as_str().cyan(),
                ">".bold()
            ),
            (Some(name), false) => format!("rowz:{}> ", name),
            (None, true) => format!("{} ", "rowz>".bold()),
            (None, false) => "rowz> ".to_string(),
        }
    }

    fn dispatch(&mut self, line: &str) -> io::Result<Flow> {
        let mut words = line.split_whitespace();
        let command = match words.next() {
            Some(command) => command,
            None => return Ok(Flow::Continue),
        };
        let args: Vec<&str> = words.collect();

        match command {
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => write!(self.output, "{}", HELP)?,
            "open" | "o" => match args.as_slice() {
                [] => self.error("Usage: open <file>")?,
                parts => self.open(Path::new(&parts.join(" ")))?,
            },
            "new" | "n" => match args.as_slice() {
                [file, fields @ ..] if !fields.is_empty() => self.create(file, fields)?,
                _ => self.error("Usage: new <file> <field> [field...]")?,
            },
            "list" | "ls" | "l" => self.reload()?,
            "reload" => self.reload()?,
            "show" | "s" => self.show(&args)?,
            "add" | "a" => self.add()?,
            "delete" | "rm" | "d" => self.delete(&args)?,
            "modify" | "m" => self.modify(&args)?,
            "edit" | "e" => self.edit(&args)?,
            "files" | "f" => self.files(args.first().copied())?,
            "info" | "i" => self.info()?,
            other => self.error(&format!(
                "Unknown command: {}. Type 'help' for commands.",
                other
            ))?,
        }
        Ok(Flow::Continue)
    }

    fn open(&mut self, path: &Path) -> io::Result<()> {
        let result = self.session.open(self.api, path);
        self.print_result(&result)?;
        if !result.success {
            return Ok(());
        }
        if result.fields.is_none() {
            let hint = format!(
                "Create it with: new {} <field> [field...]",
                path.display()
            );
            return self.print_messages(&[CmdMessage::info(hint)]);
        }
        self.print_table()
    }

    fn create(&mut self, file: &str, fields: &[&str]) -> io::Result<()> {
        let fields: Vec<&str> = fields
            .iter()
            .flat_map(|f| f.split(','))
            .filter(|f| !f.trim().is_empty())
            .collect();
        let result = self.session.create(self.api, Path::new(file), &fields);
        self.print_result(&result)?;
        if result.success {
            self.print_table()?;
        }
        Ok(())
    }

    fn reload(&mut self) -> io::Result<()> {
        if !self.require_open()? {
            return Ok(());
        }
        let result = self.session.reload(self.api);
        self.print_result(&result)?;
        self.print_table()
    }

    fn show(&mut self, args: &[&str]) -> io::Result<()> {
        if !self.require_fields()? {
            return Ok(());
        }
        match args {
            [n] => match self.resolve(n) {
                Ok((id, record)) => {
                    let number = self.session.row(id).map(|r| r.number()).unwrap_or_default();
                    let rendered = render_record(number, &record, self.use_color);
                    write!(self.output, "{}", rendered)
                }
                Err(message) => self.error(&message),
            },
            _ => self.error("Usage: show <n>"),
        }
    }

    fn add(&mut self) -> io::Result<()> {
        if !self.require_fields()? {
            return Ok(());
        }
        let fields: Vec<String> = self
            .session
            .fields()
            .map(|f| f.names().to_vec())
            .unwrap_or_default();

        let mut record = Record::new();
        for field in &fields {
            let question = format!("{}: ", field);
            let value = match ask_line(&mut self.input, &mut self.output, &question)? {
                Some(value) => value,
                None => return self.error("Input ended; record not added"),
            };
            if value.trim().is_empty() {
                return self.error(&format!(
                    "A value for '{}' is required; record not added",
                    field
                ));
            }
            record.insert(field.as_str(), value);
        }

        let result = self.session.append(self.api, &record);
        self.after_mutation(&result)
    }

    fn delete(&mut self, args: &[&str]) -> io::Result<()> {
        if !self.require_fields()? {
            return Ok(());
        }
        if args.is_empty() {
            return self.error("Usage: delete <n> [n...]");
        }
        let ids = match self.session.select(args) {
            Ok(ids) => ids,
            Err(err) => return self.error(&err.to_string()),
        };

        let listed: Vec<CmdMessage> = ids
            .iter()
            .filter_map(|id| self.session.row(*id))
            .map(CmdMessage::from)
            .collect();
        self.print_messages(&listed)?;

        let question = match ids.len() {
            1 => "Delete this record?".to_string(),
            n => format!("Delete these {} records?", n),
        };
        if !ask_yes_no(&mut self.input, &mut self.output, &question)? {
            return self.cancelled();
        }

        let result = self.session.delete(self.api, &ids);
        self.after_mutation(&result)
    }

    fn modify(&mut self, args: &[&str]) -> io::Result<()> {
        if !self.require_fields()? {
            return Ok(());
        }
        let (id, current) = match args.first().map(|n| self.resolve(n)) {
            Some(Ok(resolved)) => resolved,
            Some(Err(message)) => return self.error(&message),
            None => return self.error("Usage: modify <n> [field [value]]"),
        };
        let field_list = self
            .session
            .fields()
            .map(|f| f.to_string())
            .unwrap_or_default();

        let field = match args.get(1) {
            Some(field) => field.to_string(),
            None => {
                let question = format!("Field ({}): ", field_list);
                match ask_line(&mut self.input, &mut self.output, &question)? {
                    Some(field) => field.trim().to_string(),
                    None => return self.cancelled(),
                }
            }
        };
        let old = match current.get(&field) {
            Some(old) => old.to_string(),
            None => {
                return self.error(&format!(
                    "'{}' is not a field of this file (fields: {})",
                    field, field_list
                ))
            }
        };

        let value = if args.len() > 2 {
            args[2..].join(" ")
        } else {
            let question = format!("New value for {} (current: '{}'): ", field, old);
            match ask_line(&mut self.input, &mut self.output, &question)? {
                Some(value) => value,
                None => return self.cancelled(),
            }
        };

        let question = format!("Change: {} = '{}' -> '{}'?", field, old, value);
        if !ask_yes_no(&mut self.input, &mut self.output, &question)? {
            return self.cancelled();
        }

        let result = self.session.modify_field(self.api, id, &field, &value);
        self.after_mutation(&result)
    }

    fn edit(&mut self, args: &[&str]) -> io::Result<()> {
        if !self.require_fields()? {
            return Ok(());
        }
        let (id, current) = match args {
            [n] => match self.resolve(n) {
                Ok(resolved) => resolved,
                Err(message) => return self.error(&message),
            },
            _ => return self.error("Usage: edit <n>"),
        };

        writeln!(self.output, "Enter new values; leave empty to keep the current one.")?;
        let mut updated = Record::new();
        let mut changes = Vec::new();
        for (field, old) in current.iter() {
            let question = format!("{} [{}]: ", field, old);
            let answer = match ask_line(&mut self.input, &mut self.output, &question)? {
                Some(answer) => answer,
                None => return self.cancelled(),
            };
            if answer.is_empty() || answer == old {
                updated.insert(field, old);
            } else {
                changes.push(format!("{} = '{}' -> '{}'", field, old, answer));
                updated.insert(field, answer);
            }
        }

        if changes.is_empty() {
            return self.print_messages(&[CmdMessage::info("No changes")]);
        }
        let summary: Vec<CmdMessage> = changes.into_iter().map(CmdMessage::info).collect();
        self.print_messages(&summary)?;
        if !ask_yes_no(&mut self.input, &mut self.output, "Save these changes?")? {
            return self.cancelled();
        }

        let result = self.session.replace(self.api, id, &updated);
        self.after_mutation(&result)
    }

    fn files(&mut self, dir: Option<&str>) -> io::Result<()> {
        let dir = dir.map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
        let result = self.api.list_files(&dir);
        let lines: Vec<String> = result
            .files
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        if !lines.is_empty() {
            let listing = render_text_list(&lines, "", self.use_color);
            write!(self.output, "{}", listing)?;
        }
        self.print_result(&result)
    }

    fn info(&mut self) -> io::Result<()> {
        let path = match self.session.path() {
            Some(path) => path.to_path_buf(),
            None => return self.error("No file open. Use: open <file>"),
        };
        let result = self.api.info(&path);
        if let Some(stats) = &result.stats {
            let info = render_info(stats, self.use_color);
            write!(self.output, "{}", info)?;
        }
        self.print_result(&result)
    }

    /// Maps a displayed number to the row's id and the record as it was listed.
    fn resolve(&self, number: &str) -> Result<(RowId, Record), String> {
        let index = parse_number(number)?;
        self.session
            .row_by_number(index + 1)
            .map(|row| (row.id, row.record.clone()))
            .ok_or_else(|| {
                format!(
                    "No record {} ({} records listed)",
                    index + 1,
                    self.session.len()
                )
            })
    }

    fn after_mutation(&mut self, result: &CmdResult) -> io::Result<()> {
        self.print_result(result)?;
        self.print_table()
    }

    fn print_table(&mut self) -> io::Result<()> {
        let fields = match self.session.fields() {
            Some(fields) => fields,
            None => return Ok(()),
        };
        let rows: Vec<(usize, &Record)> = self
            .session
            .rows()
            .iter()
            .map(|row| (row.number(), &row.record))
            .collect();
        let table = render_table(fields, &rows, self.use_color);
        write!(self.output, "{}", table)
    }

    fn print_result(&mut self, result: &CmdResult) -> io::Result<()> {
        self.print_messages(&result.messages)
    }

    fn print_messages(&mut self, messages: &[CmdMessage]) -> io::Result<()> {
        let rendered = render_messages(messages, self.use_color);
        write!(self.output, "{}", rendered)
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        self.print_messages(&[CmdMessage::error(message)])
    }

    fn cancelled(&mut self) -> io::Result<()> {
        self.print_messages(&[CmdMessage::info("Cancelled")])
    }

    fn require_open(&mut self) -> io::Result<bool> {
        if self.session.is_open() {
            return Ok(true);
        }
        self.error("No file open. Use: open <file> or new <file> <fields...>")?;
        Ok(false)
    }

    fn require_fields(&mut self) -> io::Result<bool> {
        if !self.require_open()? {
            return Ok(false);
        }
        if self.session.fields().is_some() {
            return Ok(true);
        }
        self.error("The current file does not exist yet. Use: new <file> <fields...>")?;
        Ok(false)
    }
}
