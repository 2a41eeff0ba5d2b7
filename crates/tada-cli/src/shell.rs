//! Interactive shell
//!
//! A line-oriented front end over a single [`TodoList`]. The list is loaded
//! once per session and redrawn from its state subscription whenever it
//! changes. When the service ends the session the shell drops back to the
//! login prompt.

use anyhow::Result;
use tracing::{debug, warn};

use tada_core::{ApiClient, Outcome, Phase, TodoList, TodoListState};

use crate::commands::todo::resolve_id;
use crate::output::{summary, todo_line};
use crate::prompt;

const HELP: &str = "\
Commands:
  a, add <text>      add a todo
  t, toggle <id>     mark done / open
  e, edit <id>       start editing
  s <text>           save the edit with new text
  c, cancel          abandon the edit
  d, delete <id>     delete a todo
  ls                 show the list
  r, reload          fetch the list again
  logout             end the session
  h, help            show this help
  q, quit            leave";

/// One line of shell input
#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Add(&'a str),
    Toggle(&'a str),
    Edit(&'a str),
    Save(&'a str),
    Cancel,
    Delete(&'a str),
    List,
    Reload,
    Logout,
    Help,
    Quit,
    Empty,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    fn parse(line: &'a str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "" => Command::Empty,
            "a" | "add" => Command::Add(rest),
            "t" | "toggle" => Command::Toggle(rest),
            "e" | "edit" => Command::Edit(rest),
            "s" | "save" => Command::Save(rest),
            "c" | "cancel" => Command::Cancel,
            "d" | "delete" | "rm" => Command::Delete(rest),
            "ls" | "list" => Command::List,
            "r" | "reload" => Command::Reload,
            "logout" => Command::Logout,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other),
        }
    }
}

/// How a session ended
enum Exit {
    Quit,
    Relogin,
}

/// Run the shell until the user quits or input ends
pub async fn run(api: ApiClient) -> Result<()> {
    println!("tada shell. Type `help` for commands.");

    loop {
        if !api.session().is_authenticated() && !login(&api).await? {
            return Ok(());
        }

        match session(&api).await? {
            Exit::Quit => return Ok(()),
            Exit::Relogin => continue,
        }
    }
}

/// Prompt until a login succeeds
///
/// Returns false at end of input.
async fn login(api: &ApiClient) -> Result<bool> {
    println!("Log in to {}", api.base_url());

    loop {
        let Some(email) = prompt::ask("Email: ")? else {
            return Ok(false);
        };
        if email.is_empty() {
            continue;
        }
        let Some(password) = prompt::ask_password()? else {
            return Ok(false);
        };

        match api.login(&email, &password).await {
            Ok(_) => {
                println!("Logged in as {}", email);
                return Ok(true);
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}

async fn session(api: &ApiClient) -> Result<Exit> {
    let mut todos = TodoList::new(api.clone());
    let mut updates = todos.subscribe();

    if todos.load().await == Outcome::SessionEnded {
        println!("Session expired. Please log in again.");
        return Ok(Exit::Relogin);
    }

    loop {
        if updates.has_changed().unwrap_or(false) {
            render(&updates.borrow_and_update());
        }

        let prompt_text = match todos.state().edit {
            Some(ref cursor) => format!("edit {}> ", cursor.id),
            None => "> ".to_string(),
        };
        let Some(line) = prompt::ask(&prompt_text)? else {
            return Ok(Exit::Quit);
        };

        let outcome = match Command::parse(&line) {
            Command::Empty => continue,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Quit => return Ok(Exit::Quit),
            Command::List => {
                render(&updates.borrow_and_update());
                continue;
            }
            Command::Unknown(word) => {
                println!("Unknown command: {}. Type `help` for commands.", word);
                continue;
            }
            Command::Logout => {
                if let Err(e) = todos.logout() {
                    warn!("Logout could not remove the stored session: {}", e);
                    eprintln!("{}", e);
                }
                println!("Logged out.");
                return Ok(Exit::Relogin);
            }
            Command::Reload => todos.load().await,
            Command::Add(text) => {
                todos.set_input(text);
                let outcome = todos.add().await;
                if outcome == Outcome::Skipped {
                    println!("Nothing to add.");
                }
                outcome
            }
            Command::Toggle(arg) => match resolve_id(&todos.state().items, arg) {
                Ok(id) => todos.toggle(&id).await,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            Command::Edit(arg) => match resolve_id(&todos.state().items, arg) {
                Ok(id) => todos.start_edit(&id),
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
            Command::Save(text) => {
                if todos.state().edit.is_none() {
                    println!("Nothing is being edited. Start with `e <id>`.");
                    continue;
                }
                let outcome = save(&mut todos, text).await;
                if outcome == Outcome::Skipped {
                    println!("Todo text cannot be empty.");
                }
                outcome
            }
            Command::Cancel => {
                todos.cancel_edit();
                Outcome::Applied
            }
            Command::Delete(arg) => match resolve_id(&todos.state().items, arg) {
                Ok(id) => todos.delete(&id).await,
                Err(e) => {
                    println!("{}", e);
                    continue;
                }
            },
        };

        debug!("Shell command finished: {:?}", outcome);
        if outcome == Outcome::SessionEnded {
            println!("Session expired. Please log in again.");
            return Ok(Exit::Relogin);
        }
    }
}

/// Save the active edit with `text`
///
/// Blank text is rejected before it can replace the draft.
async fn save(todos: &mut TodoList, text: &str) -> Outcome {
    if text.trim().is_empty() {
        return Outcome::Skipped;
    }
    todos.set_draft(text);
    todos.save_edit().await
}

fn render(state: &TodoListState) {
    println!();
    match state.phase {
        Phase::Idle | Phase::Loading => println!("Loading..."),
        Phase::Error if state.items.is_empty() => {}
        _ if state.items.is_empty() => println!("No todos yet. Add one with `a <text>`."),
        _ => {
            for todo in &state.items {
                println!("{}", todo_line(todo));
                if let Some(ref cursor) = state.edit {
                    if cursor.id == todo.id {
                        println!("      editing: {}", cursor.draft);
                    }
                }
            }
            println!("{}", summary(&state.items));
        }
    }

    if let Some(ref error) = state.error {
        println!("! {}", error);
    }
}
