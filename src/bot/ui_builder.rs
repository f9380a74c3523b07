//! UI builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::news::{Headline, SUPPORTED_CATEGORIES};
use crate::store::{OrderSummary, Product};

/// Greeting for `/start`.
pub const WELCOME_TEXT: &str =
    "👋 Hi! I'm the market bot. Send /game to play guess-the-number, /news for \
     headlines, or /help for everything I can do.";

/// Command overview for `/help`.
pub const HELP_TEXT: &str = "ℹ️ Commands:\n\
    /game - play guess-the-number\n\
    /news [category] - top headlines\n\
    /order <name> - order a product\n\
    /help - this message\n\
    \n\
    Admin only:\n\
    /broadcast <message> - message every known chat\n\
    /addproduct <name>; <price>; <stock> - add a product\n\
    /admin - open the admin panel";

/// Reply to chat text when no game is running.
pub const CHAT_HINT: &str = "💬 Send /game to start a round, or /help for commands.";

/// Reply to photos, stickers and other non-text messages.
pub const NON_TEXT_NOTICE: &str = "I can only handle text messages. Try /help.";

/// Gate for admin-only commands.
pub const ADMIN_ONLY_NOTICE: &str = "🚫 This command is only available to the administrator.";

pub const BROADCAST_USAGE: &str = "Usage: /broadcast <message>";
pub const ADD_PRODUCT_USAGE: &str = "Usage: /addproduct <name>; <price>; <stock>";
pub const ORDER_USAGE: &str = "Usage: /order <product name>";

/// Shown when the news relay returns no usable headlines.
pub const NEWS_EMPTY_NOTICE: &str = "📰 No headlines right now. Try again later.";

/// Shown when the news relay call fails.
pub const NEWS_UNAVAILABLE_NOTICE: &str =
    "⚠️ The news service is unavailable right now. Try again later.";

/// Heading for the admin panel root view.
pub const PANEL_TEXT: &str = "🛠 Admin panel. Pick a view:";

/// Shown in place of the panel once it is closed.
pub const PANEL_CLOSED_TEXT: &str = "🛠 Panel closed.";

/// How much one restock button press adds to a product's stock.
pub const RESTOCK_STEP: i64 = 5;

const MAX_BUTTON_LABEL: usize = 20;

/// Format a cent amount as dollars, e.g. 499 -> "$4.99".
pub fn format_price(cents: i64) -> String {
    format!("${}.{:02}", cents / 100, cents % 100)
}

pub fn unsupported_category_notice(category: &str) -> String {
    format!(
        "🤷 Unknown category \"{}\". Try one of: {}.",
        category,
        SUPPORTED_CATEGORIES.join(", ")
    )
}

pub fn product_added_notice(name: &str, price_cents: i64, stock: i64) -> String {
    format!(
        "✅ Added {} ({}) with {} in stock.",
        name,
        format_price(price_cents),
        stock
    )
}

pub fn bad_product_spec_notice(reason: &str) -> String {
    format!("⚠️ {}. {}", reason, ADD_PRODUCT_USAGE)
}

pub fn product_not_found_notice(name: &str) -> String {
    format!("🔎 I don't know a product called \"{}\".", name)
}

pub fn out_of_stock_notice(name: &str) -> String {
    format!("😔 {} is out of stock.", name)
}

pub fn order_placed_notice(order_number: i64, product_name: &str) -> String {
    format!(
        "🧾 Order #{} placed for {}. We'll be in touch!",
        order_number, product_name
    )
}

/// Format the product catalog as a numbered list for the admin panel.
pub fn format_product_list(products: &[Product]) -> String {
    if products.is_empty() {
        return format!("📦 No products yet. {}", ADD_PRODUCT_USAGE);
    }

    let mut result = String::from("📦 Products:\n");
    for (i, product) in products.iter().enumerate() {
        result.push_str(&format!(
            "{}. {} → {} ({} in stock)\n",
            i + 1,
            product.name,
            format_price(product.price_cents),
            product.stock
        ));
    }
    result
}

/// Format open orders for the admin panel, oldest first.
pub fn format_order_list(orders: &[OrderSummary]) -> String {
    if orders.is_empty() {
        return "🧾 No open orders.".to_string();
    }

    let mut result = String::from("🧾 Open orders:\n");
    for order in orders {
        result.push_str(&format!(
            "#{} {} → chat {}\n",
            order.number, order.product_name, order.chat_id
        ));
    }
    result
}

/// Format fetched headlines as a numbered list.
pub fn format_headlines(headlines: &[Headline], category: &str) -> String {
    if headlines.is_empty() {
        return NEWS_EMPTY_NOTICE.to_string();
    }

    let mut result = format!("📰 Top {} headlines:\n", category);
    for (i, headline) in headlines.iter().enumerate() {
        result.push_str(&format!("{}. {}\n{}\n", i + 1, headline.title, headline.url));
    }
    result
}

/// Create the inline keyboard for the admin panel root view.
pub fn panel_keyboard() -> InlineKeyboardMarkup {
    let buttons = vec![
        vec![InlineKeyboardButton::callback(
            "📦 Products",
            "panel_products".to_string(),
        )],
        vec![InlineKeyboardButton::callback(
            "🧾 Orders",
            "panel_orders".to_string(),
        )],
        vec![InlineKeyboardButton::callback(
            "✖ Close",
            "panel_close".to_string(),
        )],
    ];
    InlineKeyboardMarkup::new(buttons)
}

/// Create the inline keyboard for the products view. One restock button per
/// product, plus a back button.
pub fn products_keyboard(products: &[Product]) -> InlineKeyboardMarkup {
    let mut buttons = Vec::new();

    for product in products {
        buttons.push(vec![InlineKeyboardButton::callback(
            format!("➕{} {}", RESTOCK_STEP, clip_label(&product.name)),
            format!("restock_{}", product.id),
        )]);
    }

    buttons.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        "panel_main".to_string(),
    )]);
    InlineKeyboardMarkup::new(buttons)
}

/// Create the inline keyboard for the orders view. One done button per open
/// order, plus a back button.
pub fn orders_keyboard(orders: &[OrderSummary]) -> InlineKeyboardMarkup {
    let mut buttons = Vec::new();

    for order in orders {
        buttons.push(vec![InlineKeyboardButton::callback(
            format!("✅ #{} {}", order.number, clip_label(&order.product_name)),
            format!("done_{}", order.id),
        )]);
    }

    buttons.push(vec![InlineKeyboardButton::callback(
        "⬅️ Back",
        "panel_main".to_string(),
    )]);
    InlineKeyboardMarkup::new(buttons)
}

// Truncate long names so button labels stay readable.
fn clip_label(text: &str) -> String {
    if text.chars().count() > MAX_BUTTON_LABEL {
        let clipped: String = text.chars().take(MAX_BUTTON_LABEL - 3).collect();
        format!("{}...", clipped)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use teloxide::types::InlineKeyboardButtonKind;

    fn sample_product(id: i64, name: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id,
            name: name.to_string(),
            price_cents,
            stock,
            created_at: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        }
    }

    fn sample_order(id: i64, number: i64, chat_id: i64, product_name: &str) -> OrderSummary {
        OrderSummary {
            id,
            number,
            chat_id,
            product_name: product_name.to_string(),
        }
    }

    fn callback_data(button: &InlineKeyboardButton) -> &str {
        match &button.kind {
            InlineKeyboardButtonKind::CallbackData(data) => data,
            other => panic!("unexpected button kind: {:?}", other),
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(499), "$4.99");
        assert_eq!(format_price(400), "$4.00");
        assert_eq!(format_price(5), "$0.05");
        assert_eq!(format_price(1500), "$15.00");
        assert_eq!(format_price(0), "$0.00");
    }

    #[test]
    fn test_format_product_list() {
        let products = vec![
            sample_product(1, "Coffee Beans", 499, 10),
            sample_product(2, "Teapot", 1500, 2),
        ];
        let text = format_product_list(&products);
        assert!(text.contains("1. Coffee Beans → $4.99 (10 in stock)"));
        assert!(text.contains("2. Teapot → $15.00 (2 in stock)"));
    }

    #[test]
    fn test_format_product_list_empty() {
        let text = format_product_list(&[]);
        assert!(text.contains("No products yet"));
        assert!(text.contains("/addproduct"));
    }

    #[test]
    fn test_format_order_list() {
        let orders = vec![
            sample_order(10, 1, 111, "Coffee Beans"),
            sample_order(11, 2, 222, "Teapot"),
        ];
        let text = format_order_list(&orders);
        assert!(text.contains("#1 Coffee Beans → chat 111"));
        assert!(text.contains("#2 Teapot → chat 222"));

        assert_eq!(format_order_list(&[]), "🧾 No open orders.");
    }

    #[test]
    fn test_format_headlines() {
        let headlines = vec![
            Headline {
                title: "Markets rally".to_string(),
                url: "https://example.com/a".to_string(),
            },
            Headline {
                title: "Rates hold".to_string(),
                url: "https://example.com/b".to_string(),
            },
        ];
        let text = format_headlines(&headlines, "business");
        assert!(text.contains("Top business headlines"));
        assert!(text.contains("1. Markets rally"));
        assert!(text.contains("https://example.com/b"));

        assert_eq!(format_headlines(&[], "business"), NEWS_EMPTY_NOTICE);
    }

    #[test]
    fn test_unsupported_category_notice_lists_options() {
        let text = unsupported_category_notice("finance");
        assert!(text.contains("\"finance\""));
        assert!(text.contains("sports"));
        assert!(text.contains("technology"));
    }

    #[test]
    fn test_panel_keyboard_callback_data() {
        let keyboard = panel_keyboard();
        let data: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(callback_data)
            .collect();
        assert_eq!(data, vec!["panel_products", "panel_orders", "panel_close"]);
    }

    #[test]
    fn test_products_keyboard_callback_data() {
        let products = vec![
            sample_product(7, "Coffee Beans", 499, 10),
            sample_product(9, "Teapot", 1500, 2),
        ];
        let keyboard = products_keyboard(&products);
        let data: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(callback_data)
            .collect();
        assert_eq!(data, vec!["restock_7", "restock_9", "panel_main"]);
    }

    #[test]
    fn test_orders_keyboard_callback_data() {
        let orders = vec![sample_order(10, 1, 111, "Coffee Beans")];
        let keyboard = orders_keyboard(&orders);
        let data: Vec<&str> = keyboard
            .inline_keyboard
            .iter()
            .flatten()
            .map(callback_data)
            .collect();
        assert_eq!(data, vec!["done_10", "panel_main"]);
    }

    #[test]
    fn test_clip_label_keeps_short_names() {
        assert_eq!(clip_label("Teapot"), "Teapot");
        let clipped = clip_label("An unreasonably long product name");
        assert!(clipped.ends_with("..."));
        assert_eq!(clipped.chars().count(), MAX_BUTTON_LABEL);
    }
}
