//! Interactive shopping session.
//!
//! Reads one command per line and renders the resulting state. A cart
//! subscriber keeps the item-count badge in the prompt current.
//!
//! ```text
//! help                 Show commands
//! list                 Show products
//! search [TEXT]        Filter by name (no text clears the search)
//! category [NAME|all]  Filter by category (no name lists categories)
//! add ID               Add a product to the cart
//! remove ID            Remove a product from the cart
//! cart | open          Show the cart
//! close                Hide the cart
//! clear                Empty the cart
//! checkout             Place the order
//! quit                 Leave the store
//! ```

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use poom_store_core::ProductId;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::catalog::CategoryFilter;
use crate::error::Result;
use crate::render;
use crate::view::Storefront;

const HELP: &str = "\
Commands:
  list                 Show products
  search [TEXT]        Filter by name (no text clears the search)
  category [NAME|all]  Filter by category (no name lists categories)
  add ID               Add a product to the cart
  remove ID            Remove a product from the cart
  cart | open          Show the cart
  close                Hide the cart
  clear                Empty the cart
  checkout             Place the order
  quit                 Leave the store";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Help,
    List,
    Search(String),
    Category(Option<CategoryFilter>),
    Add(ProductId),
    Remove(ProductId),
    OpenCart,
    CloseCart,
    Clear,
    Checkout,
    Quit,
}

/// Errors from parsing a shell command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCommandError {
    #[error("Unknown command '{0}'. Type 'help' for a list of commands.")]
    Unknown(String),
    #[error("'{0}' needs a product ID.")]
    MissingId(&'static str),
    #[error("'{0}' is not a valid product ID.")]
    InvalidId(String),
}

impl FromStr for ShellCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(c, r)| (c, r.trim()));

        let product_id = |name: &'static str| -> std::result::Result<ProductId, ParseCommandError> {
            if rest.is_empty() {
                return Err(ParseCommandError::MissingId(name));
            }
            rest.parse()
                .map_err(|_| ParseCommandError::InvalidId(rest.to_string()))
        };

        match command.to_lowercase().as_str() {
            "help" | "?" => Ok(Self::Help),
            "list" | "ls" => Ok(Self::List),
            "search" => Ok(Self::Search(rest.to_string())),
            "category" => Ok(Self::Category(if rest.is_empty() {
                None
            } else {
                rest.parse().ok()
            })),
            "add" => product_id("add").map(Self::Add),
            "remove" | "rm" => product_id("remove").map(Self::Remove),
            "cart" | "open" => Ok(Self::OpenCart),
            "close" => Ok(Self::CloseCart),
            "clear" => Ok(Self::Clear),
            "checkout" => Ok(Self::Checkout),
            "quit" | "exit" => Ok(Self::Quit),
            _ => Err(ParseCommandError::Unknown(command.to_string())),
        }
    }
}

/// Run a session until `quit` or end of input.
///
/// Loads the catalog first, then processes commands from `input`, writing
/// everything the shopper sees to `out`.
///
/// # Errors
///
/// Returns an error only if reading `input` or writing `out` fails.
pub async fn run<R, W>(storefront: &mut Storefront, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let badge = Arc::new(AtomicU64::new(storefront.cart().total_items()));
    let sink = Arc::clone(&badge);
    let subscription = storefront.cart_mut().subscribe(move |items| {
        let count = items.iter().map(|i| u64::from(i.quantity)).sum();
        sink.store(count, Ordering::Relaxed);
    });

    render::write_catalog(out, storefront)?;
    let source = storefront.load_catalog().await;
    render::write_catalog(out, storefront)?;
    render::write_catalog_source(out, source)?;

    let mut lines = input.lines();
    loop {
        write!(out, "[cart: {}] > ", badge.load(Ordering::Relaxed))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => execute(storefront, command, out).await?,
            Err(e) => writeln!(out, "{e}")?,
        }
    }

    storefront.cart_mut().unsubscribe(subscription);
    Ok(())
}

async fn execute<W: Write>(
    storefront: &mut Storefront,
    command: ShellCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        ShellCommand::Help => writeln!(out, "{HELP}")?,
        ShellCommand::List => render::write_catalog(out, storefront)?,
        ShellCommand::Search(query) => {
            storefront.set_search_query(query);
            render::write_catalog(out, storefront)?;
        }
        ShellCommand::Category(None) => {
            for category in CategoryFilter::offered() {
                writeln!(out, "  {category}")?;
            }
        }
        ShellCommand::Category(Some(category)) => {
            storefront.select_category(category);
            render::write_catalog(out, storefront)?;
        }
        ShellCommand::Add(id) => {
            if storefront.add_to_cart(id) {
                let name = storefront
                    .cart()
                    .get(id)
                    .map_or_else(String::new, |item| item.name.clone());
                writeln!(out, "Added {name} to your cart.")?;
            } else {
                writeln!(out, "No product with ID {id}.")?;
            }
        }
        ShellCommand::Remove(id) => {
            storefront.remove_from_cart(id);
            if storefront.is_cart_open() {
                render::write_cart(out, storefront.cart())?;
            }
        }
        ShellCommand::OpenCart => {
            storefront.open_cart();
            render::write_cart(out, storefront.cart())?;
        }
        ShellCommand::CloseCart => {
            storefront.close_cart();
            writeln!(out, "Cart closed.")?;
        }
        ShellCommand::Clear => {
            storefront.cart_mut().clear_cart();
            writeln!(out, "Cart cleared.")?;
        }
        ShellCommand::Checkout => {
            writeln!(out, "Placing order...")?;
            match storefront.checkout().await {
                Ok(outcome) => render::write_checkout_outcome(out, &outcome)?,
                Err(refused) => render::write_checkout_refused(out, refused)?,
            }
        }
        ShellCommand::Quit => {}
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;
    use crate::api::StoreApiClient;
    use poom_store_core::UserId;

    #[test]
    fn test_parse_commands() {
        assert_eq!("help".parse(), Ok(ShellCommand::Help));
        assert_eq!("  LIST ".parse(), Ok(ShellCommand::List));
        assert_eq!(
            "search gaming mouse".parse(),
            Ok(ShellCommand::Search("gaming mouse".to_string()))
        );
        assert_eq!("search".parse(), Ok(ShellCommand::Search(String::new())));
        assert_eq!(
            "category Gaming Gear".parse(),
            Ok(ShellCommand::Category(Some(CategoryFilter::Named(
                "Gaming Gear".to_string()
            ))))
        );
        assert_eq!(
            "category all".parse(),
            Ok(ShellCommand::Category(Some(CategoryFilter::All)))
        );
        assert_eq!("category".parse(), Ok(ShellCommand::Category(None)));
        assert_eq!("add 7".parse(), Ok(ShellCommand::Add(ProductId::new(7))));
        assert_eq!("rm 7".parse(), Ok(ShellCommand::Remove(ProductId::new(7))));
        assert_eq!("checkout".parse(), Ok(ShellCommand::Checkout));
        assert_eq!("exit".parse(), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "add".parse::<ShellCommand>(),
            Err(ParseCommandError::MissingId("add"))
        );
        assert_eq!(
            "remove seven".parse::<ShellCommand>(),
            Err(ParseCommandError::InvalidId("seven".to_string()))
        );
        assert_eq!(
            "dance".parse::<ShellCommand>(),
            Err(ParseCommandError::Unknown("dance".to_string()))
        );
    }

    #[tokio::test]
    async fn test_offline_session_keeps_cart_after_failed_checkout() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = StoreApiClient::with_base_url(Url::parse(&format!("http://{addr}/")).unwrap());
        let mut storefront = Storefront::new(api, UserId::new(1));

        let input: &[u8] = b"add 1\nadd 1\nadd 99\ncart\ncheckout\nquit\n";
        let mut out = Vec::new();
        run(&mut storefront, input, &mut out).await.unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Loading products..."));
        assert!(text.contains("showing sample products"));
        assert!(text.contains("Added Test Product to your cart."));
        assert!(text.contains("No product with ID 99."));
        assert!(text.contains("[cart: 2] > "));
        assert!(text.contains("฿100 x 2"));
        assert!(text.contains("Order failed."));

        assert_eq!(storefront.cart().total_items(), 2);
        assert!(!storefront.is_checking_out());
    }

    #[tokio::test]
    async fn test_checkout_with_empty_cart_is_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let api = StoreApiClient::with_base_url(Url::parse(&format!("http://{addr}/")).unwrap());
        let mut storefront = Storefront::new(api, UserId::new(1));

        let input: &[u8] = b"checkout\n";
        let mut out = Vec::new();
        run(&mut storefront, input, &mut out).await.unwrap();

        assert!(String::from_utf8(out).unwrap().contains("Your cart is empty."));
    }
}
