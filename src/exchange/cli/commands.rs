use super::print::{
    print_application, print_choices, print_location, print_messages, print_notice, print_search,
};
use super::setup::{Cli, Commands};
use clap::Parser;
use directories::ProjectDirs;
use exchange::api::{BuilderApi, BuilderMode, CmdMessage, CmdResult, OverlayKind};
use exchange::catalog::Catalog;
use exchange::config::BuilderConfig;
use exchange::error::{BuilderError, Result};
use exchange::logging;
use exchange::overlay::Location;
use exchange::store::fs::FileStore;
use exchange::store::ApplicationStore;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

const SESSION_HELP: &str = "\
Commands:
  list                 show the ranked choices
  search [text]        open the search dialog (and filter)
  open | close         open or close the search dialog
  pick <n>             toggle row <n> of the last search listing
  add <name|id>        toggle a university by name or id
  rm <rank>            remove the choice at <rank>
  up <rank>            move a choice one rank up
  down <rank>          move a choice one rank down
  order <ranks..>      reorder, e.g. `order 3 1 2`
  submit               validate and ask for confirmation
  confirm | cancel     answer the confirmation
  dismiss              dismiss the error notice
  back | forward       browser navigation
  discard              drop unsubmitted edits
  url                  show the location and dialog states
  quit";

struct AppContext {
    data_dir: PathBuf,
    config: BuilderConfig,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command {
        Some(Commands::Session { catalog, edit, at }) => handle_session(&ctx, &catalog, edit, at),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
        Some(Commands::Show) | None => handle_show(&ctx),
    }
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let data_dir = match &cli.home {
        Some(home) => home.clone(),
        None => ProjectDirs::from("org", "exchange", "exchange-builder")
            .ok_or_else(|| BuilderError::Api("Could not determine data dir".to_string()))?
            .data_dir()
            .to_path_buf(),
    };
    let config = BuilderConfig::load(&data_dir)?;
    tracing::debug!(data_dir = %data_dir.display(), "context initialized");

    Ok(AppContext { data_dir, config })
}

fn handle_show(ctx: &AppContext) -> Result<()> {
    let store = FileStore::new(ctx.data_dir.clone());
    match store.latest()? {
        Some(application) => print_application(&application),
        None => print_messages(&[CmdMessage::info("No application submitted yet.")]),
    }
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    match (key, value) {
        (None, _) => {
            for key in BuilderConfig::KEYS {
                if let Some(v) = ctx.config.get(key) {
                    println!("{} = {}", key, v);
                }
            }
        }
        (Some(key), None) => match ctx.config.get(&key) {
            Some(v) => println!("{} = {}", key, v),
            None => print_messages(&[CmdMessage::error(format!("Unknown config key: {}", key))]),
        },
        (Some(key), Some(value)) => {
            let mut config = ctx.config.clone();
            match config.set(&key, &value) {
                Ok(()) => {
                    config.save(&ctx.data_dir)?;
                    let shown = config.get(&key).unwrap_or(value);
                    print_messages(&[CmdMessage::success(format!("{} = {}", key, shown))]);
                }
                Err(msg) => print_messages(&[CmdMessage::error(msg)]),
            }
        }
    }
    Ok(())
}

fn handle_session(ctx: &AppContext, catalog: &Path, edit: bool, at: Option<String>) -> Result<()> {
    let catalog = Catalog::load(catalog)?;
    let store = FileStore::new(ctx.data_dir.clone());
    let mode = if edit {
        BuilderMode::Edit
    } else {
        BuilderMode::New
    };
    let api = match at {
        Some(raw) => {
            let location = Location::from_str(&raw).map_err(BuilderError::Api)?;
            BuilderApi::mount_at(store, catalog, &ctx.config, mode, location)?
        }
        None => BuilderApi::mount(store, catalog, &ctx.config, mode)?,
    };

    let interactive = std::io::stdin().is_terminal();
    let mut session = Session {
        api,
        last_rows: Vec::new(),
    };
    if interactive {
        println!("Type `help` for commands.");
    }
    print_choices(session.api.choices());
    if session.api.overlay(OverlayKind::Search).is_open {
        session.show_search();
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if interactive {
            print!("> ");
            std::io::stdout().flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let command = match line.parse::<SessionCommand>() {
            Ok(command) => command,
            Err(msg) => {
                print_messages(&[CmdMessage::error(msg)]);
                continue;
            }
        };
        if command == SessionCommand::Quit {
            break;
        }
        let navigates = matches!(command, SessionCommand::Back | SessionCommand::Forward);

        // Errors inside a session are reported, not fatal
        if let Err(e) = session.dispatch(command) {
            print_messages(&[CmdMessage::error(e.to_string())]);
        }
        session.api.settle();

        if navigates {
            session.show_location();
        }
        if session.api.notice().is_some_and(|n| n.shake) {
            session.api.clear_shake();
        }
    }

    session.api.unmount();
    Ok(())
}

struct Session {
    api: BuilderApi<FileStore>,
    /// Ids of the rows in the last printed search listing, for `pick`
    last_rows: Vec<Uuid>,
}

impl Session {
    fn dispatch(&mut self, command: SessionCommand) -> Result<()> {
        match command {
            SessionCommand::List => print_choices(self.api.choices()),
            SessionCommand::Search(query) => {
                let result = self.api.set_query(&query)?;
                print_messages(&result.messages);
                self.show_search();
            }
            SessionCommand::Open => {
                let result = self.api.open_search()?;
                print_messages(&result.messages);
                self.show_search();
            }
            SessionCommand::Close => {
                let result = self.api.close_search()?;
                print_messages(&result.messages);
                self.last_rows.clear();
            }
            SessionCommand::Pick(n) => {
                let id = n
                    .checked_sub(1)
                    .and_then(|i| self.last_rows.get(i))
                    .copied()
                    .ok_or_else(|| BuilderError::Api(format!("No row {} in the last listing", n)))?;
                let result = self.api.toggle(&id)?;
                print_messages(&result.messages);
                if self.api.overlay(OverlayKind::Search).is_open {
                    self.show_search();
                }
            }
            SessionCommand::Toggle(term) => {
                let result = self.api.toggle_by_term(&term)?;
                print_result(&result);
            }
            SessionCommand::Remove(rank) => print_result(&self.api.remove_at(rank)?),
            SessionCommand::Up(rank) => print_result(&self.api.move_by(rank, -1)?),
            SessionCommand::Down(rank) => print_result(&self.api.move_by(rank, 1)?),
            SessionCommand::Order(ranks) => print_result(&self.api.reorder_by_ranks(&ranks)?),
            SessionCommand::Submit => {
                let result = self.api.submit()?;
                print_messages(&result.messages);
            }
            SessionCommand::Confirm => {
                let result = self.api.confirm()?;
                print_messages(&result.messages);
                if let Some(application) = &result.application {
                    print_application(application);
                }
            }
            SessionCommand::Cancel => {
                let result = self.api.cancel()?;
                print_messages(&result.messages);
            }
            SessionCommand::Dismiss => self.api.dismiss_notice(),
            SessionCommand::Back => self.api.back(),
            SessionCommand::Forward => self.api.forward(),
            SessionCommand::Discard => print_result(&self.api.discard()?),
            SessionCommand::Status => self.show_location(),
            SessionCommand::Help => println!("{}", SESSION_HELP),
            SessionCommand::Quit => {}
        }
        Ok(())
    }

    fn show_search(&mut self) {
        let view = self.api.search_view();
        self.last_rows = print_search(self.api.search_query(), &view);
    }

    fn show_location(&self) {
        let overlays = [
            (OverlayKind::Search, self.api.overlay(OverlayKind::Search)),
            (OverlayKind::Confirm, self.api.overlay(OverlayKind::Confirm)),
        ];
        print_location(self.api.location(), &overlays);
        if let Some(notice) = self.api.notice() {
            print_notice(notice);
        }
    }
}

fn print_result(result: &CmdResult) {
    print_messages(&result.messages);
    print_choices(&result.choices);
}

/// One line of session input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionCommand {
    List,
    Search(String),
    Open,
    Close,
    Pick(usize),
    Toggle(String),
    Remove(usize),
    Up(usize),
    Down(usize),
    Order(Vec<usize>),
    Submit,
    Confirm,
    Cancel,
    Dismiss,
    Back,
    Forward,
    Discard,
    Status,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        let (word, rest) = match s.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (s, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "list" | "ls" => SessionCommand::List,
            "search" | "find" => SessionCommand::Search(rest.to_string()),
            "open" => SessionCommand::Open,
            "close" => SessionCommand::Close,
            "pick" => SessionCommand::Pick(parse_number(rest)?),
            "add" | "toggle" => {
                if rest.is_empty() {
                    return Err(format!("Usage: {} <name|id>", word));
                }
                SessionCommand::Toggle(rest.to_string())
            }
            "rm" | "remove" => SessionCommand::Remove(parse_number(rest)?),
            "up" => SessionCommand::Up(parse_number(rest)?),
            "down" => SessionCommand::Down(parse_number(rest)?),
            "order" => {
                let ranks = rest
                    .split_whitespace()
                    .map(parse_number)
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                if ranks.is_empty() {
                    return Err("Usage: order <rank> <rank> ...".to_string());
                }
                SessionCommand::Order(ranks)
            }
            "submit" => SessionCommand::Submit,
            "confirm" | "yes" => SessionCommand::Confirm,
            "cancel" | "no" => SessionCommand::Cancel,
            "dismiss" => SessionCommand::Dismiss,
            "back" => SessionCommand::Back,
            "forward" => SessionCommand::Forward,
            "discard" => SessionCommand::Discard,
            "url" | "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" | "q" => SessionCommand::Quit,
            other => return Err(format!("Unknown command: {} (try `help`)", other)),
        };
        Ok(command)
    }
}

fn parse_number(s: &str) -> std::result::Result<usize, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("Expected a number, got '{}'", s.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_commands() {
        assert_eq!("ls".parse(), Ok(SessionCommand::List));
        assert_eq!("  Submit ".parse(), Ok(SessionCommand::Submit));
        assert_eq!("url".parse(), Ok(SessionCommand::Status));
        assert_eq!("exit".parse(), Ok(SessionCommand::Quit));
    }

    #[test]
    fn search_keeps_the_whole_query() {
        assert_eq!(
            "search  university of".parse(),
            Ok(SessionCommand::Search("university of".to_string()))
        );
        assert_eq!("search".parse(), Ok(SessionCommand::Search(String::new())));
    }

    #[test]
    fn numeric_arguments_are_checked() {
        assert_eq!("rm 2".parse(), Ok(SessionCommand::Remove(2)));
        assert_eq!("order 3 1 2".parse(), Ok(SessionCommand::Order(vec![3, 1, 2])));
        assert!("rm two".parse::<SessionCommand>().is_err());
        assert!("order".parse::<SessionCommand>().is_err());
        assert!("pick".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn add_requires_a_term() {
        assert_eq!(
            "add ETH Zurich".parse(),
            Ok(SessionCommand::Toggle("ETH Zurich".to_string()))
        );
        assert!("add".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        let err = "launch".parse::<SessionCommand>().unwrap_err();
        assert!(err.contains("Unknown command"));
    }
}
