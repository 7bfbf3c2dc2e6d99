use console::style;
use tabled::{
    settings::{Alignment, Style},
    Table, Tabled,
};

use crate::models::{product::Product, store::Store, unit_measure::UnitMeasure};

#[derive(Tabled)]
struct ProductTableRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Product")]
    product_name: String,
    #[tabled(rename = "Store")]
    store: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Unit price")]
    unit_price: String,
}

#[derive(Tabled)]
struct OptionTableRow {
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Label")]
    label: String,
}

pub fn format_product_table<'a>(products: impl IntoIterator<Item = &'a Product>) -> String {
    let rows: Vec<ProductTableRow> = products
        .into_iter()
        .enumerate()
        .map(|(index, product)| ProductTableRow {
            position: index + 1,
            product_name: truncate(product.product_name(), 30),
            store: product.store_name().label().to_string(),
            price: format_amount(product.price()),
            quantity: format_quantity(product),
            unit_price: format_unit_price(product),
        })
        .collect();

    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new(rows);
    table.with(Style::rounded()).with(Alignment::left());
    table.to_string()
}

pub fn format_product_detail(product: &Product) -> String {
    let mut output = String::new();

    output.push_str(&format!("{}: {}\n", style("Product").bold(), style(product.product_name()).green()));
    output.push_str(&format!("{}: {}\n", style("Store").bold(), product.store_name()));
    if !product.product_url().is_empty() {
        output.push_str(&format!("{}: {}\n", style("URL").bold(), style(product.product_url()).dim()));
    }
    output.push_str(&format!("{}: {}\n", style("Price").bold(), format_amount(product.price())));
    output.push_str(&format!("{}: {}\n", style("Quantity").bold(), format_quantity(product)));
    output.push_str(&format!(
        "{}: {} {}\n",
        style("Base quantity").bold(),
        trim_number(product.quantity_converted()),
        product.unit_measure().base_unit_label()
    ));
    output.push_str(&format!(
        "{}: {}\n",
        style("Unit price").bold(),
        style(format_unit_price(product)).cyan()
    ));

    output
}

pub fn format_store_options() -> String {
    option_table(Store::ALL.iter().map(|s| (s.value(), s.label())))
}

pub fn format_unit_options() -> String {
    option_table(UnitMeasure::ALL.iter().map(|u| (u.value(), u.label())))
}

fn option_table<'a>(options: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    let rows: Vec<OptionTableRow> = options
        .map(|(value, label)| OptionTableRow {
            value: value.to_string(),
            label: label.to_string(),
        })
        .collect();

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

pub fn format_amount(amount: f64) -> String {
    format!("${:.2}", amount)
}

pub fn format_unit_price(product: &Product) -> String {
    format!(
        "${:.4} / {}",
        product.price_unit_measure(),
        product.unit_measure().base_unit_label()
    )
}

fn format_quantity(product: &Product) -> String {
    format!("{} {}", trim_number(product.quantity()), product.unit_measure())
}

/// `12` rather than `12.0`, `0.5` stays `0.5`.
pub fn trim_number(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let cut: String = text.chars().take(max - 3).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}
