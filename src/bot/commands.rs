//! Command parsing for incoming messages.
//!
//! Messages starting with `/` are commands; everything else is chat text
//! (and usually a guess). Command names are matched case-insensitively and
//! a `@botname` suffix is stripped, so `/game@marketbot` works in groups.

use anyhow::{anyhow, Result};
use regex::Regex;
use std::sync::LazyLock;

/// Leading character that marks a message as a command.
pub const COMMAND_PREFIX: char = '/';

// Matches `name; price; stock` where price is whole units with an optional
// one or two digit fraction, e.g. "Coffee Beans; 4.99; 10".
static PRODUCT_SPEC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<name>[^;]+?)\s*;\s*(?P<whole>\d+)(?:[.,](?P<frac>\d{1,2}))?\s*;\s*(?P<stock>\d+)\s*$")
        .expect("Product spec pattern should be valid")
});

/// A recognized command with its arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Help,
    Game,
    News { category: Option<String> },
    Broadcast { text: String },
    Admin,
    AddProduct { spec: String },
    Order { name: String },
    Unknown,
}

/// Arguments for adding a product, parsed from `name; price; stock`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub price_cents: i64,
    pub stock: i64,
}

/// Whether a message text is a command.
pub fn is_command(text: &str) -> bool {
    text.trim_start().starts_with(COMMAND_PREFIX)
}

/// Parse a message into a command. Returns `None` for plain chat text and
/// `Command::Unknown` for a command the bot does not recognize.
pub fn parse_command(text: &str) -> Option<Command> {
    let trimmed = text.trim();
    if !trimmed.starts_with(COMMAND_PREFIX) {
        return None;
    }

    let (token, rest) = trimmed
        .split_once(char::is_whitespace)
        .unwrap_or((trimmed, ""));
    let args = rest.trim();

    // "/game@marketbot" -> "game"
    let name = &token[COMMAND_PREFIX.len_utf8()..];
    let name = name.split_once('@').map(|(n, _)| n).unwrap_or(name);

    let command = match name.to_lowercase().as_str() {
        "start" => Command::Start,
        "help" => Command::Help,
        "game" => Command::Game,
        "news" => Command::News {
            category: args.split_whitespace().next().map(|c| c.to_lowercase()),
        },
        "broadcast" => Command::Broadcast {
            text: args.to_string(),
        },
        "admin" => Command::Admin,
        "addproduct" => Command::AddProduct {
            spec: args.to_string(),
        },
        "order" => Command::Order {
            name: args.to_string(),
        },
        _ => Command::Unknown,
    };
    Some(command)
}

/// Parse a `name; price; stock` product spec into insertable fields.
pub fn parse_product_spec(spec: &str) -> Result<NewProduct> {
    let captures = PRODUCT_SPEC_REGEX
        .captures(spec)
        .ok_or_else(|| anyhow!("Expected `name; price; stock`"))?;

    let name = captures["name"].trim().to_string();

    let whole: i64 = captures["whole"]
        .parse()
        .map_err(|_| anyhow!("Price is not a number"))?;
    let frac: i64 = match captures.name("frac") {
        Some(m) if m.as_str().len() == 1 => {
            m.as_str().parse::<i64>().map_err(|_| anyhow!("Price is not a number"))? * 10
        }
        Some(m) => m
            .as_str()
            .parse()
            .map_err(|_| anyhow!("Price is not a number"))?,
        None => 0,
    };
    let price_cents = whole
        .checked_mul(100)
        .and_then(|c| c.checked_add(frac))
        .ok_or_else(|| anyhow!("Price is out of range"))?;

    let stock: i64 = captures["stock"]
        .parse()
        .map_err(|_| anyhow!("Stock is not a number"))?;

    Ok(NewProduct {
        name,
        price_cents,
        stock,
    })
}
