//! Todo command handlers
//!
//! Every command goes through the same [`TodoList`] the shell uses, so local
//! state only reflects what the service confirmed.

use anyhow::{bail, Result};

use tada_core::{ApiClient, Todo, TodoId, TodoList};

use super::check;
use crate::output::Output;
use crate::prompt::confirm;

/// List all todos
pub async fn list(api: &ApiClient, output: &Output) -> Result<()> {
    let todos = open_list(api).await?;
    output.print_todos(&todos.state().items);
    Ok(())
}

/// Create a todo
pub async fn add(api: &ApiClient, text: Vec<String>, output: &Output) -> Result<()> {
    require_login(api)?;

    let mut todos = TodoList::new(api.clone());
    todos.set_input(text.join(" "));

    if !check(todos.add().await)?.is_applied() {
        output.message("Nothing to add.");
        return Ok(());
    }

    if let Some(todo) = todos.state().items.last() {
        output.success(&format!("Added todo {}", todo.id));
        if !output.is_quiet() {
            output.print_todo(todo);
        }
    }
    Ok(())
}

/// Flip a todo between open and done
pub async fn toggle(api: &ApiClient, id: String, output: &Output) -> Result<()> {
    let mut todos = open_list(api).await?;
    let id = resolve_id(&todos.state().items, &id)?;

    check(todos.toggle(&id).await)?;

    if let Some(todo) = todos.state().get(&id) {
        let verb = if todo.completed { "done" } else { "open" };
        output.success(&format!("Marked {} {}", todo.id, verb));
        if !output.is_quiet() {
            output.print_todo(todo);
        }
    }
    Ok(())
}

/// Replace a todo's text
pub async fn edit(api: &ApiClient, id: String, text: Vec<String>, output: &Output) -> Result<()> {
    let mut todos = open_list(api).await?;
    let id = resolve_id(&todos.state().items, &id)?;

    todos.start_edit(&id);
    todos.set_draft(text.join(" "));

    if !check(todos.save_edit().await)?.is_applied() {
        bail!("Todo text cannot be empty");
    }

    if let Some(todo) = todos.state().get(&id) {
        output.success(&format!("Updated todo {}", todo.id));
        if !output.is_quiet() {
            output.print_todo(todo);
        }
    }
    Ok(())
}

/// Delete a todo
pub async fn delete(api: &ApiClient, id: String, yes: bool, output: &Output) -> Result<()> {
    let mut todos = open_list(api).await?;
    let id = resolve_id(&todos.state().items, &id)?;

    // Confirm deletion in interactive mode
    if !yes && output.should_prompt() {
        if let Some(todo) = todos.state().get(&id) {
            println!("Delete todo {}: {}", todo.id, todo.text);
        }
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    check(todos.delete(&id).await)?;
    output.success(&format!("Deleted todo {}", id));
    Ok(())
}

fn require_login(api: &ApiClient) -> Result<()> {
    if !api.session().is_authenticated() {
        bail!("Not logged in. Run `tada login <email>` first.");
    }
    Ok(())
}

/// Build a list and fetch the collection
async fn open_list(api: &ApiClient) -> Result<TodoList> {
    require_login(api)?;

    let mut todos = TodoList::new(api.clone());
    check(todos.load().await)?;
    Ok(todos)
}

/// Match a command-line id against the loaded items
pub(crate) fn resolve_id(items: &[Todo], arg: &str) -> Result<TodoId> {
    let arg = arg.trim();
    match items.iter().find(|t| t.id.to_string() == arg) {
        Some(todo) => Ok(todo.id.clone()),
        None => bail!("No todo found with id: {}", arg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(id: TodoId, text: &str) -> Todo {
        Todo {
            id,
            text: text.to_string(),
            completed: false,
        }
    }

    #[test]
    fn test_resolve_numeric_id() {
        let items = vec![todo(TodoId::Int(1), "a"), todo(TodoId::Int(12), "b")];
        assert_eq!(resolve_id(&items, "12").unwrap(), TodoId::Int(12));
        assert_eq!(resolve_id(&items, " 1 ").unwrap(), TodoId::Int(1));
    }

    #[test]
    fn test_resolve_string_id() {
        let items = vec![todo(TodoId::from("abc"), "a")];
        assert_eq!(resolve_id(&items, "abc").unwrap(), TodoId::from("abc"));
    }

    #[test]
    fn test_resolve_unknown_id() {
        let items = vec![todo(TodoId::Int(1), "a")];
        let err = resolve_id(&items, "2").unwrap_err();
        assert!(err.to_string().contains("No todo found"));

        // No prefix matching
        let items = vec![todo(TodoId::Int(12), "a")];
        assert!(resolve_id(&items, "1").is_err());
    }
}
