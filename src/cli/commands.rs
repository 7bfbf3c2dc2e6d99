use std::sync::Arc;
use anyhow::{Context, Result};
use console::{style, Emoji};
use dialoguer::{Confirm, Input, Select, theme::ColorfulTheme};

use tracing::{error, info, warn};
use validator::ValidationErrors;

use crate::{
    cli::args::*,
    models::{
        product::{Product, ProductError, ProductForm},
        store::Store,
        unit_measure::UnitMeasure,
    },
    services::{FormController, FormControllerError, FormState},
    storage::{repositories::LocalStorageCartRepository, LocalStorage},
    utils::{
        formatting::{
            format_product_detail, format_product_table, format_store_options, format_unit_options,
            format_unit_price,
        },
        Config,
    },
};

static CHECKMARK: Emoji<'_, '_> = Emoji("✅ ", "");
static CROSS: Emoji<'_, '_> = Emoji("❌ ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️ ", "");
static INFO: Emoji<'_, '_> = Emoji("ℹ️ ", "");
static CART: Emoji<'_, '_> = Emoji("🛒 ", "");

#[derive(Clone, Copy)]
enum SessionAction {
    AddProduct,
    AddToCart,
    ShowCart,
    Clear,
    Quit,
}

impl SessionAction {
    fn label(self) -> &'static str {
        match self {
            SessionAction::AddProduct => "Add product",
            SessionAction::AddToCart => "Add a product to the shopping cart",
            SessionAction::ShowCart => "Show shopping cart",
            SessionAction::Clear => "Clear products",
            SessionAction::Quit => "Quit",
        }
    }
}

pub struct CliApp {
    config: Config,
    controller: FormController,
}

impl CliApp {
    pub async fn new(config: Config) -> Result<Self> {
        let storage = LocalStorage::open(&config.storage_dir, config.storage_quota_bytes)
            .await
            .context("Failed to open local storage")?;
        info!(
            "Local storage at {} (quota {} bytes)",
            storage.file_path().display(),
            storage.quota_bytes()
        );

        let cart_repo = Arc::new(LocalStorageCartRepository::new(Arc::new(storage)));
        let mut controller = FormController::new(cart_repo);

        if let Err(e) = controller.load_cart().await {
            println!("{} Stored shopping cart could not be read, starting empty: {}", WARNING, style(&e).yellow());
            warn!("Starting with an empty cart: {}", e);
        }

        Ok(Self { config, controller })
    }

    pub async fn run(&mut self, args: Args) -> Result<()> {
        match args.command.unwrap_or(Commands::Session) {
            Commands::Session => self.handle_session().await,
            Commands::Cart { command } => self.handle_cart_command(command),
            Commands::Quote { name, price, quantity, unit, store, url } => {
                self.handle_quote(name, price, quantity, unit, store, url)
            }
            Commands::Options => self.handle_options(),
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    // Interactive session
    async fn handle_session(&mut self) -> Result<()> {
        println!("{} {}", CART, style("Price compare").bold().cyan());
        let theme = ColorfulTheme::default();

        loop {
            self.print_catalog();

            let mut actions = vec![SessionAction::AddProduct];
            if !self.controller.catalog().is_empty() {
                actions.push(SessionAction::AddToCart);
                actions.push(SessionAction::Clear);
            }
            actions.push(SessionAction::ShowCart);
            actions.push(SessionAction::Quit);

            let labels: Vec<&str> = actions.iter().map(|a| a.label()).collect();
            let selection = Select::with_theme(&theme)
                .with_prompt("What next?")
                .items(&labels)
                .default(0)
                .interact()?;

            match actions[selection] {
                SessionAction::AddProduct => self.handle_add_product(&theme)?,
                SessionAction::AddToCart => self.handle_add_to_cart(&theme).await?,
                SessionAction::ShowCart => self.print_cart(),
                SessionAction::Clear => self.handle_clear(&theme)?,
                SessionAction::Quit => break,
            }
        }

        info!("Session finished");
        Ok(())
    }

    fn handle_add_product(&mut self, theme: &ColorfulTheme) -> Result<()> {
        println!("{} {}", INFO, style("New product").bold().cyan());

        let initial = match self.controller.state() {
            FormState::Rejected { form, .. } => form.clone(),
            FormState::Idle => self.controller.form_defaults(),
        };
        let form = prompt_product_form(theme, &initial)?;

        match self.controller.submit(form) {
            Ok(product) => {
                println!("{} Product added!", CHECKMARK);
                println!("{}", format_product_detail(&product));
            }
            Err(FormControllerError::ValidationError(errors)) => {
                println!("{} Product not added:", CROSS);
                print_field_errors(&errors);
            }
            Err(e) => {
                println!("{} Product not added: {}", CROSS, style(&e).red());
            }
        }

        Ok(())
    }

    async fn handle_add_to_cart(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let shown: Vec<Product> = self.controller.catalog().sorted().into_iter().cloned().collect();
        let choices: Vec<String> = shown
            .iter()
            .map(|p| format!("{} ({}) {}", p.product_name(), p.store_name(), format_unit_price(p)))
            .collect();

        let position = Select::with_theme(theme)
            .with_prompt("Product to add to the cart")
            .items(&choices)
            .default(0)
            .interact()?;

        let product = shown[position].clone();
        match self.controller.move_to_cart(product).await {
            Ok(product) => {
                println!("{} '{}' added to the shopping cart", CHECKMARK, style(product.product_name()).green());
            }
            Err(FormControllerError::PersistenceError(e)) => {
                println!("{} Added to the cart, but it could not be saved: {}", WARNING, style(&e).yellow());
                warn!("Cart not persisted: {}", e);
            }
            Err(e) => {
                println!("{} Failed to add to cart: {}", CROSS, style(&e).red());
                error!("Failed to add to cart: {}", e);
            }
        }

        Ok(())
    }

    fn handle_clear(&mut self, theme: &ColorfulTheme) -> Result<()> {
        let confirm = Confirm::with_theme(theme)
            .with_prompt("Clear all entered products?")
            .default(false)
            .interact()?;

        if !confirm {
            println!("Nothing cleared");
            return Ok(());
        }

        let removed = self.controller.clear();
        println!("{} {} products cleared", CHECKMARK, removed);
        Ok(())
    }

    fn print_catalog(&self) {
        let catalog = self.controller.catalog();
        if catalog.is_empty() {
            println!("{} No products yet", INFO);
            return;
        }

        println!("{} {}", INFO, style(format!("Products ({})", catalog.len())).bold());
        println!("{}", format_product_table(catalog.sorted()));
    }

    fn print_cart(&self) {
        let cart = self.controller.cart();
        if cart.is_empty() {
            println!("{} Shopping cart is empty", INFO);
            return;
        }

        println!("{} {}", CART, style(format!("Shopping cart ({})", cart.len())).bold());
        println!("{}", format_product_table(cart.items()));
    }

    // Cart Commands
    fn handle_cart_command(&self, command: CartCommands) -> Result<()> {
        match command {
            CartCommands::List => self.print_cart(),
        }
        Ok(())
    }

    fn handle_quote(
        &self,
        name: String,
        price: f64,
        quantity: f64,
        unit: UnitArg,
        store: StoreArg,
        url: Option<String>,
    ) -> Result<()> {
        let form = ProductForm::new(name, price, quantity, unit.into())
            .with_store(store.into())
            .with_url(url.unwrap_or_default());

        match Product::new(form) {
            Ok(product) => println!("{}", format_product_detail(&product)),
            Err(ProductError::ValidationError(errors)) => {
                println!("{} Invalid product:", CROSS);
                print_field_errors(&errors);
            }
            Err(e) => println!("{} Invalid product: {}", CROSS, style(&e).red()),
        }

        Ok(())
    }

    fn handle_options(&self) -> Result<()> {
        println!("{}", style("Stores").bold());
        println!("{}", format_store_options());
        println!("{}", style("Units of measure").bold());
        println!("{}", format_unit_options());
        Ok(())
    }

    fn handle_config_command(&self, command: ConfigCommands) -> Result<()> {
        match command {
            ConfigCommands::Show => {
                println!("{} {}", INFO, style("Configuration").bold().cyan());
                println!("Storage directory: {}", style(self.config.storage_dir.display()).green());
                println!("Storage quota: {} bytes", style(self.config.storage_quota_bytes).green());
                println!("Log level: {}", style(&self.config.log_level).green());
                println!(
                    "Environment: {}{}",
                    style(&self.config.environment).green(),
                    if self.config.is_production() { " (production)" } else { "" }
                );
            }
        }
        Ok(())
    }
}

fn prompt_product_form(theme: &ColorfulTheme, initial: &ProductForm) -> Result<ProductForm> {
    let product_name: String = Input::with_theme(theme)
        .with_prompt("Product name")
        .with_initial_text(initial.product_name.clone())
        .allow_empty(true)
        .interact_text()?;

    let store_labels: Vec<&str> = Store::ALL.iter().map(|s| s.label()).collect();
    let store_index = Select::with_theme(theme)
        .with_prompt("Store")
        .items(&store_labels)
        .default(Store::ALL.iter().position(|s| *s == initial.store_name).unwrap_or_default())
        .interact()?;

    let product_url: String = Input::with_theme(theme)
        .with_prompt("Product URL")
        .with_initial_text(initial.product_url.clone())
        .allow_empty(true)
        .interact_text()?;

    let price = prompt_number(theme, "Price", initial.price)?;
    let quantity = prompt_number(theme, "Weight or units", initial.quantity)?;

    let unit_labels: Vec<&str> = UnitMeasure::ALL.iter().map(|u| u.label()).collect();
    let unit_index = Select::with_theme(theme)
        .with_prompt("Unit of measure")
        .items(&unit_labels)
        .default(initial.unit_measure.position())
        .interact()?;

    Ok(ProductForm {
        product_name,
        store_name: Store::ALL[store_index],
        product_url,
        price,
        quantity,
        unit_measure: UnitMeasure::ALL[unit_index],
    })
}

fn prompt_number(theme: &ColorfulTheme, prompt: &str, initial: Option<f64>) -> Result<Option<f64>> {
    let text: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .with_initial_text(initial.map(|v| v.to_string()).unwrap_or_default())
        .allow_empty(true)
        .validate_with(|input: &String| -> Result<(), &str> {
            let input = input.trim();
            if input.is_empty() || parse_number(input).is_some() {
                Ok(())
            } else {
                Err("Please enter a finite number")
            }
        })
        .interact_text()?;

    Ok(parse_number(&text))
}

/// Empty input means the field was left blank. `inf` and `NaN` are not numbers here.
fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        text.parse().ok().filter(|v: &f64| v.is_finite())
    }
}

fn field_label(field: &str) -> &str {
    match field {
        "product_name" => "Product name",
        "price" => "Price",
        "quantity" => "Weight or units",
        other => other,
    }
}

fn print_field_errors(errors: &ValidationErrors) {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);

    for (field, field_errors) in fields {
        for error in field_errors {
            let message = error.message.as_deref().unwrap_or(error.code.as_ref());
            println!("   {}: {}", style(field_label(field)).bold(), style(message).red());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("12"), Some(12.0));
        assert_eq!(parse_number(" 0.5 "), Some(0.5));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("-infinity"), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(field_label("product_name"), "Product name");
        assert_eq!(field_label("quantity"), "Weight or units");
        assert_eq!(field_label("other"), "other");
    }
}
