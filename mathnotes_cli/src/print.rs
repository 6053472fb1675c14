use mathnotes_core::view::{
    CategoryRegistryView, FormulaForm, FormulaListView, PlainTypesetter, Preview, Typesetter,
    NO_MATCHES,
};
use mathnotes_core::Catalog;

pub fn formula_list(view: &FormulaListView, catalog: &Catalog, typesetter: &dyn Typesetter) {
    println!("Formulas ({} found)", FormulaListView::heading_count(catalog));
    let filter = view.query.category;
    for option in FormulaListView::filter_options(catalog) {
        let marker = if option.filter == filter { '*' } else { ' ' };
        println!("  {marker} [{}] {}", option.filter.to_raw(), option.label);
    }
    println!();

    let cards = view.visible(catalog, typesetter);
    if cards.is_empty() {
        println!("{NO_MATCHES}");
        return;
    }
    for card in cards {
        println!("#{} {}", card.formula.id, card.formula.description);
        println!("    {}", display(&card.display));
        println!(
            "    Category: {} | Added: {}",
            card.category_name, card.formula.created_at
        );
    }
}

pub fn categories(catalog: &Catalog) {
    let rows = CategoryRegistryView::rows(catalog);
    if rows.is_empty() {
        println!("No categories yet.");
    }
    for row in rows {
        println!("{} ({}) - {} formula(s)", row.name, row.id, row.formulas);
    }
}

pub fn preview(form: &FormulaForm) {
    eprintln!("Preview: {}", display(&form.preview(&PlainTypesetter)));
}

fn display(preview: &Preview) -> String {
    match preview {
        Preview::Placeholder => "(the formula will appear here)".to_string(),
        Preview::Rendered(text) => text.clone(),
        Preview::Error(message) => format!("[cannot render: {message}]"),
    }
}
