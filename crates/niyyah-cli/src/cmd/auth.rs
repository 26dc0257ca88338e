use crate::context::Ctx;
use crate::output::print_json;
use anyhow::Context;
use niyyah_core::types::Registration;
use std::io::{BufRead, Write};

pub fn register(
    ctx: &Ctx,
    email: &str,
    password: Option<String>,
    timezone: &str,
) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let store = ctx.store();
    let mut session = store.load().context("failed to read session")?;
    let api = ctx.client()?;

    let registration = Registration {
        email: email.to_string(),
        password,
        timezone: timezone.to_string(),
    };
    api.register(&mut session, &registration)?;
    store.save(&session).context("failed to save session")?;

    if ctx.json {
        print_json(&serde_json::json!({ "email": email, "registered": true }))?;
    } else {
        println!("Registered and logged in as {email}.");
    }
    Ok(())
}

pub fn login(ctx: &Ctx, email: &str, password: Option<String>) -> anyhow::Result<()> {
    let password = resolve_password(password)?;
    let store = ctx.store();
    let mut session = store.load().context("failed to read session")?;
    let api = ctx.client()?;

    api.login(&mut session, email, &password)?;
    store.save(&session).context("failed to save session")?;

    if ctx.json {
        print_json(&serde_json::json!({ "email": email, "logged_in": true }))?;
    } else {
        println!("Logged in as {email}.");
    }
    Ok(())
}

/// Succeeds without a stored session; there is simply nothing to revoke.
pub fn logout(ctx: &Ctx) -> anyhow::Result<()> {
    let store = ctx.store();
    let mut session = store.load().context("failed to read session")?;
    let was_active = session.is_active();
    if was_active {
        let api = ctx.client()?;
        api.logout(&mut session)?;
    }
    store.clear().context("failed to remove session")?;

    if ctx.json {
        print_json(&serde_json::json!({ "logged_out": true, "was_active": was_active }))?;
    } else if was_active {
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

pub fn whoami(ctx: &Ctx) -> anyhow::Result<()> {
    let user = ctx.with_session(|api, session| api.me(session))?;

    if ctx.json {
        print_json(&user)?;
        return Ok(());
    }
    println!("Email:     {}", user.email);
    println!("Timezone:  {}", user.timezone);
    println!("Locale:    {}", user.locale);
    println!("Tier:      {}", user.subscription_tier.as_str());
    Ok(())
}

fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(p) = password {
        return Ok(p);
    }
    eprint!("Password: ");
    std::io::stderr().flush().ok();
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        anyhow::bail!("password is required");
    }
    Ok(password)
}
