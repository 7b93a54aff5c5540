use crate::{
    api::HttpApi, model::User, search::filter_users, store::FetchOutcome, store::UserStore,
    transcript::Transcript, validate::UserForm, Args,
};
use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::cell::RefCell;
use std::rc::Rc;

pub struct Context {
    pub args: Args,
    pub session_id: String,
    pub api: HttpApi,
    pub store: RefCell<UserStore>,
    pub query: RefCell<String>,
    pub transcript: Rc<RefCell<Transcript>>,
}

/// Startup fetch, mirroring the list view's load-on-mount. Failures are
/// reported with the retry hint; the session continues either way.
pub fn startup_fetch(ctx: &Context) {
    println!("Fetching users from {} ...", ctx.api.endpoint());
    let outcome = ctx.store.borrow_mut().fetch_users(&ctx.api);
    report_fetch(ctx, outcome);
}

fn report_fetch(ctx: &Context, outcome: FetchOutcome) {
    match outcome {
        FetchOutcome::Fetched(count) => println!("Loaded {} users.", count),
        FetchOutcome::Failed => {
            println!("Error: {}", ctx.store.borrow().error_msg());
            println!("Run /fetch to try again.");
        }
        FetchOutcome::AlreadyInFlight => println!("A fetch is already in progress."),
    }
}

pub fn run_once(ctx: &Context, command: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    handle_command(ctx, &mut rl, command.trim());
    Ok(())
}

pub fn run_repl(ctx: Context) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("roster - type /help for commands, /exit to quit");

    loop {
        match rl.readline(">>> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                if line.starts_with('/') {
                    if handle_command(&ctx, &mut rl, line) {
                        break;
                    }
                    continue;
                }

                // Bare input is a search, like typing into the search box.
                set_query(&ctx, line);
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Input error: {}", e);
                break;
            }
        }
    }

    Ok(())
}

fn handle_command(ctx: &Context, rl: &mut DefaultEditor, cmd: &str) -> bool {
    let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
    let arg = if parts.len() > 1 { parts[1].trim() } else { "" };
    match parts[0] {
        "/exit" | "/quit" => return true,
        "/help" => {
            println!("Commands:");
            println!("  /exit           - quit");
            println!("  /help           - show commands");
            println!("  /list           - list users (filtered when a search is active)");
            println!("  /search <text>  - filter by name, email, or phone");
            println!("  /clear          - clear the active search");
            println!("  /show <id>      - show full details for one user");
            println!("  /add            - add a user (prompts for each field)");
            println!("  /edit <id>      - edit a user (empty input keeps the current value)");
            println!("  /rm <id>        - delete a user (asks for confirmation)");
            println!("  /fetch          - reload the list from the endpoint");
            println!("  /session        - show session info");
            println!("Typing anything else searches, same as /search.");
        }
        "/session" => {
            println!("Session: {}", ctx.session_id);
            println!("Endpoint: {}", ctx.api.endpoint());
            println!("Transcript: {:?}", ctx.transcript.borrow().path);
        }
        "/list" => cmd_list(ctx),
        "/search" => {
            if arg.is_empty() {
                let query = ctx.query.borrow();
                if query.is_empty() {
                    println!("No search active. Use /search <text>.");
                } else {
                    println!("Current search: \"{}\"", query);
                }
            } else {
                set_query(ctx, arg);
            }
        }
        "/clear" => {
            ctx.query.borrow_mut().clear();
            println!("Search cleared.");
        }
        "/show" => match parse_id(arg) {
            Some(id) => cmd_show(ctx, id),
            None => println!("Usage: /show <id>"),
        },
        "/add" => {
            if let Err(e) = cmd_add(ctx, rl) {
                eprintln!("Error: {}", e);
            }
        }
        "/edit" => match parse_id(arg) {
            Some(id) => {
                if let Err(e) = cmd_edit(ctx, rl, id) {
                    eprintln!("Error: {}", e);
                }
            }
            None => println!("Usage: /edit <id>"),
        },
        "/rm" => match parse_id(arg) {
            Some(id) => {
                if let Err(e) = cmd_rm(ctx, rl, id) {
                    eprintln!("Error: {}", e);
                }
            }
            None => println!("Usage: /rm <id>"),
        },
        "/fetch" => {
            let outcome = ctx.store.borrow_mut().fetch_users(&ctx.api);
            report_fetch(ctx, outcome);
        }
        _ => println!("Unknown command: {}", parts[0]),
    }
    false
}

fn parse_id(arg: &str) -> Option<u64> {
    arg.parse::<u64>().ok()
}

fn set_query(ctx: &Context, text: &str) {
    *ctx.query.borrow_mut() = text.to_string();
    let store = ctx.store.borrow();
    let hits = filter_users(store.users(), text).len();
    let _ = ctx
        .transcript
        .borrow_mut()
        .search(text, hits, store.users().len());
    drop(store);
    cmd_list(ctx);
}

fn cmd_list(ctx: &Context) {
    let store = ctx.store.borrow();

    // Fetch failed: show the error, not a stale or empty list.
    if !store.error_msg().is_empty() {
        println!("Error: {}", store.error_msg());
        println!("Run /fetch to try again.");
        return;
    }

    let query = ctx.query.borrow();
    let visible = filter_users(store.users(), &query);

    if visible.is_empty() {
        if query.is_empty() {
            println!("No users found. Use /add to create one.");
        } else {
            println!("No users found matching \"{}\".", query);
            println!("Try a different search term, or /clear.");
        }
        return;
    }

    if !query.is_empty() {
        println!(
            "Showing {} of {} users (search: \"{}\")",
            visible.len(),
            store.users().len(),
            query
        );
    }
    for user in visible {
        print_card(user);
    }
}

fn print_card(user: &User) {
    match &user.company {
        Some(company) => println!("#{} {}  [{}]", user.id, user.name, company.name),
        None => println!("#{} {}", user.id, user.name),
    }
    println!("    {}  {}", user.email, user.phone);
    println!(
        "    {} {}, {}",
        user.address.suite, user.address.street, user.address.city
    );
}

fn cmd_show(ctx: &Context, id: u64) {
    let store = ctx.store.borrow();
    let Some(user) = store.get(id) else {
        println!("No user with id {}.", id);
        return;
    };

    println!("{}", user.name);
    if let Some(username) = &user.username {
        println!("@{}", username);
    }
    println!("  email:   {}", user.email);
    println!("  phone:   {}", user.phone);
    if let Some(website) = &user.website {
        println!("  website: {}", website);
    }
    println!("  Address");
    println!("    {}", user.address.street);
    println!("    {}", user.address.suite);
    println!("    {}, {}", user.address.city, user.address.zipcode);
    if let Some(company) = &user.company {
        println!("  Company");
        println!("    {}", company.name);
        if let Some(catch_phrase) = &company.catch_phrase {
            println!("    {}", catch_phrase);
        }
    }
}

fn cmd_add(ctx: &Context, rl: &mut DefaultEditor) -> Result<()> {
    println!("Add new user (Ctrl-C to cancel):");
    let Some(form) = prompt_form(rl, None)? else {
        println!("Cancelled.");
        return Ok(());
    };

    match form.validate() {
        Ok(form) => {
            let id = ctx.store.borrow_mut().add_user(form.into_candidate());
            println!("Added user #{}.", id);
        }
        Err(errors) => print_violations(&errors),
    }
    Ok(())
}

fn cmd_edit(ctx: &Context, rl: &mut DefaultEditor, id: u64) -> Result<()> {
    let current = {
        let store = ctx.store.borrow();
        match store.get(id) {
            Some(user) => UserForm::from_user(user),
            None => {
                println!("No user with id {}.", id);
                return Ok(());
            }
        }
    };

    println!("Edit user #{} (empty input keeps the current value, Ctrl-C to cancel):", id);
    let Some(form) = prompt_form(rl, Some(&current))? else {
        println!("Cancelled.");
        return Ok(());
    };

    match form.validate() {
        Ok(form) => {
            if ctx.store.borrow_mut().update_user(id, form.into_patch()) {
                println!("Updated user #{}.", id);
            } else {
                println!("No user with id {}.", id);
            }
        }
        Err(errors) => print_violations(&errors),
    }
    Ok(())
}

fn cmd_rm(ctx: &Context, rl: &mut DefaultEditor, id: u64) -> Result<()> {
    let name = {
        let store = ctx.store.borrow();
        match store.get(id) {
            Some(user) => user.name.clone(),
            None => {
                println!("No user with id {}.", id);
                return Ok(());
            }
        }
    };

    println!("Delete user \"{}\" (#{})? This cannot be undone.", name, id);
    match rl.readline("[y/N]: ") {
        Ok(answer) if answer.trim().eq_ignore_ascii_case("y") => {
            if ctx.store.borrow_mut().delete_user(id) {
                println!("Deleted user #{}.", id);
            } else {
                println!("No user with id {}.", id);
            }
        }
        Ok(_) => println!("Cancelled."),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => println!("Cancelled."),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

fn print_violations(errors: &[crate::validate::FieldError]) {
    println!("Invalid input, nothing saved:");
    for error in errors {
        println!("  {}", error);
    }
}

/// Prompt for every editable field. Returns None if the user aborts.
fn prompt_form(rl: &mut DefaultEditor, current: Option<&UserForm>) -> Result<Option<UserForm>> {
    let Some(name) = prompt_field(rl, "Name", current.map(|f| f.name.as_str()))? else {
        return Ok(None);
    };
    let Some(email) = prompt_field(rl, "Email", current.map(|f| f.email.as_str()))? else {
        return Ok(None);
    };
    let Some(phone) = prompt_field(rl, "Phone", current.map(|f| f.phone.as_str()))? else {
        return Ok(None);
    };
    let Some(city) = prompt_field(rl, "City", current.map(|f| f.city.as_str()))? else {
        return Ok(None);
    };
    let Some(suite) = prompt_field(rl, "Suite", current.map(|f| f.suite.as_str()))? else {
        return Ok(None);
    };
    let Some(street) = prompt_field(rl, "Street", current.map(|f| f.street.as_str()))? else {
        return Ok(None);
    };
    let zipcode = match prompt_field(
        rl,
        "Zip code (optional)",
        current.and_then(|f| f.zipcode.as_deref()),
    )? {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value),
        None => return Ok(None),
    };

    Ok(Some(UserForm {
        name,
        email,
        phone,
        city,
        suite,
        street,
        zipcode,
    }))
}

/// Read one field. Empty input keeps the current value when one exists.
/// Returns None on Ctrl-C / EOF.
fn prompt_field(
    rl: &mut DefaultEditor,
    label: &str,
    current: Option<&str>,
) -> Result<Option<String>> {
    let prompt = match current {
        Some(value) if !value.is_empty() => format!("{} [{}]: ", label, value),
        _ => format!("{}: ", label),
    };
    match rl.readline(&prompt) {
        Ok(line) => {
            let line = line.trim();
            if line.is_empty() {
                Ok(Some(current.unwrap_or("").to_string()))
            } else {
                Ok(Some(line.to_string()))
            }
        }
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
