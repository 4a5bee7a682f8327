use crate::store::{Filter, Todo, TodoId, TodoStore};
use anyhow::{Context, Result, anyhow, bail};
use std::io::{BufRead, Write};
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  add <label>        add a new todo
  toggle <id>        flip a todo between finished and unfinished
  filter <filter>    select all, finished or unfinished
  list               show todos matching the current filter
  finished           show finished todos
  unfinished         show unfinished todos
  show <id>          show a single todo
  help               show this help
  quit               leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Toggle(TodoId),
    Filter(Filter),
    List,
    Finished,
    Unfinished,
    Show(TodoId),
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name {
            "add" => Command::Add(rest.to_string()),
            "toggle" => Command::Toggle(parse_id(rest)?),
            "show" => Command::Show(parse_id(rest)?),
            "filter" => {
                if rest.is_empty() {
                    bail!("usage: filter <all|finished|unfinished>");
                }
                Command::Filter(rest.parse()?)
            }
            "list" => Command::List,
            "finished" => Command::Finished,
            "unfinished" => Command::Unfinished,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("unknown command '{}' (try 'help')", other),
        };
        Ok(Some(command))
    }
}

fn parse_id(arg: &str) -> Result<TodoId> {
    if arg.is_empty() {
        bail!("missing todo id");
    }
    arg.parse()
        .map_err(|_| anyhow!("invalid todo id '{}'", arg))
}

pub fn render_todo(todo: &Todo) -> String {
    let checkbox = if todo.finished { "[x]" } else { "[ ]" };
    format!("{} {} {}", checkbox, todo.id, todo.label)
}

pub struct Shell {
    pub store: TodoStore,
}

impl Shell {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    /// Runs one command. Returns `false` once the session should end.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> Result<bool> {
        debug!(?command, "executing");
        match command {
            Command::Add(label) => {
                let id = self.store.add_todo(label);
                writeln!(out, "added {}", id)?;
            }
            Command::Toggle(id) => {
                let finished = self.store.toggle_todo(id)?;
                let state = if finished { "finished" } else { "unfinished" };
                writeln!(out, "{} is now {}", id, state)?;
            }
            Command::Filter(filter) => {
                self.store.set_filter(filter);
                writeln!(out, "filter: {}", filter)?;
            }
            Command::List => write_todos(out, &self.store.filtered_todos())?,
            Command::Finished => write_todos(out, &self.store.finished_todos())?,
            Command::Unfinished => write_todos(out, &self.store.unfinished_todos())?,
            Command::Show(id) => {
                let todo = self.store.find_todo(id)?;
                writeln!(out, "{}", render_todo(todo))?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }

    /// Reads commands line by line until end of input or `quit`. Bad input
    /// and failed actions are reported on `out` without ending the session.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        for line in input.lines() {
            let line = line.context("Failed to read command")?;

            let command = match Command::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    writeln!(out, "error: {}", e)?;
                    continue;
                }
            };

            match self.execute(command, out) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    warn!("command failed: {}", e);
                    writeln!(out, "error: {}", e)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn write_todos<W: Write>(out: &mut W, todos: &[&Todo]) -> Result<()> {
    if todos.is_empty() {
        writeln!(out, "(no todos)")?;
    }
    for todo in todos {
        writeln!(out, "{}", render_todo(todo))?;
    }
    Ok(())
}
