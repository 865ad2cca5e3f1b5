use scraper::{ElementRef, Html, Selector};

use crate::error::{PipelineError, Result};
use crate::extractor::inventory::{
    ButtonRecord, ElementInventory, FormInput, FormRecord, InputRecord, LinkRecord,
};

// ============================================================================
// DOM -> ElementInventory
// ============================================================================

/// Parse an HTML document and collect its buttons, links, inputs and forms.
///
/// Buttons are `<button>` elements plus `<input type="button">`, in document
/// order. Inputs exclude `type="button"`. Absent attributes become empty
/// strings (or an empty class list).
pub fn scrape_elements(html: &str) -> Result<ElementInventory> {
    let document = Html::parse_document(html);

    let button_sel = selector("button, input")?;
    let link_sel = selector("a")?;
    let input_sel = selector("input")?;
    let form_sel = selector("form")?;

    let buttons = document
        .select(&button_sel)
        .filter(|el| el.value().name() == "button" || is_input_button(el))
        .map(|el| ButtonRecord {
            text: text_of(&el),
            id: attr(&el, "id"),
            classes: classes(&el),
            button_type: attr(&el, "type"),
        })
        .collect();

    let links = document
        .select(&link_sel)
        .map(|el| LinkRecord {
            text: text_of(&el),
            href: attr(&el, "href"),
            id: attr(&el, "id"),
            classes: classes(&el),
        })
        .collect();

    let inputs = document
        .select(&input_sel)
        .filter(|el| !is_input_button(el))
        .map(|el| InputRecord {
            input_type: attr(&el, "type"),
            name: attr(&el, "name"),
            id: attr(&el, "id"),
            placeholder: attr(&el, "placeholder"),
        })
        .collect();

    let forms = document
        .select(&form_sel)
        .map(|form| FormRecord {
            action: attr(&form, "action"),
            method: attr(&form, "method"),
            id: attr(&form, "id"),
            inputs: form
                .select(&input_sel)
                .map(|i| FormInput {
                    input_type: attr(&i, "type"),
                    name: attr(&i, "name"),
                })
                .collect(),
        })
        .collect();

    Ok(ElementInventory {
        buttons,
        links,
        inputs,
        forms,
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| PipelineError::parse(format!("selector '{}'", css), e))
}

fn is_input_button(el: &ElementRef<'_>) -> bool {
    el.value().name() == "input" && el.value().attr("type") == Some("button")
}

fn attr(el: &ElementRef<'_>, name: &str) -> String {
    el.value().attr(name).unwrap_or_default().to_string()
}

fn classes(el: &ElementRef<'_>) -> Vec<String> {
    el.value()
        .attr("class")
        .map(|c| c.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

fn text_of(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
