use clap::{Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

use crate::models::{store::Store, unit_measure::UnitMeasure};

#[derive(Parser)]
#[command(name = "price-compare")]
#[command(about = "Compare product prices per gram, milliliter or unit and keep a shopping cart")]
#[command(version = "0.1.0")]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the local storage file
    #[arg(long, global = true)]
    pub storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Interactive session: enter products, compare them, fill the cart
    Session,
    /// Shopping cart commands
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// Work out the unit price of one product without storing it
    Quote {
        /// Product name
        #[arg(short, long)]
        name: String,
        /// Total price paid
        #[arg(short, long)]
        price: f64,
        /// Weight, volume or count
        #[arg(short, long)]
        quantity: f64,
        /// Unit of measure
        #[arg(short, long, default_value = "unit")]
        unit: UnitArg,
        /// Store
        #[arg(short, long, default_value = "walmart")]
        store: StoreArg,
        /// Product URL
        #[arg(long)]
        url: Option<String>,
    },
    /// List the store and unit of measure options
    Options,
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum CartCommands {
    /// Show the stored shopping cart
    List,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum UnitArg {
    Unit,
    Kg,
    L,
    Pack,
}

impl From<UnitArg> for UnitMeasure {
    fn from(unit: UnitArg) -> Self {
        match unit {
            UnitArg::Unit => UnitMeasure::Unit,
            UnitArg::Kg => UnitMeasure::Kg,
            UnitArg::L => UnitMeasure::L,
            UnitArg::Pack => UnitMeasure::Pack,
        }
    }
}

impl fmt::Display for UnitArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", UnitMeasure::from(*self))
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum StoreArg {
    Walmart,
    Soriana,
    Chedraui,
    Costco,
    Heb,
    Amazon,
    Other,
}

impl From<StoreArg> for Store {
    fn from(store: StoreArg) -> Self {
        match store {
            StoreArg::Walmart => Store::Walmart,
            StoreArg::Soriana => Store::Soriana,
            StoreArg::Chedraui => Store::Chedraui,
            StoreArg::Costco => Store::Costco,
            StoreArg::Heb => Store::Heb,
            StoreArg::Amazon => Store::Amazon,
            StoreArg::Other => Store::Other,
        }
    }
}

impl fmt::Display for StoreArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Store::from(*self).value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let args = Args::try_parse_from([
            "price-compare", "quote", "--name", "Milk", "--price", "20", "--quantity", "1", "--unit", "l",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Quote { name, price, quantity, unit, store, url }) => {
                assert_eq!(name, "Milk");
                assert_eq!(price, 20.0);
                assert_eq!(quantity, 1.0);
                assert_eq!(UnitMeasure::from(unit), UnitMeasure::L);
                assert_eq!(Store::from(store), Store::Walmart);
                assert!(url.is_none());
            }
            _ => panic!("expected quote command"),
        }
    }

    #[test]
    fn test_session_is_the_default() {
        let args = Args::try_parse_from(["price-compare", "--verbose"]).unwrap();
        assert!(args.verbose);
        assert!(args.command.is_none());
    }
}
