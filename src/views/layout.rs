use maud::{html, Markup, DOCTYPE};

fn head_assets(title: &str) -> Markup {
    html! {
        meta charset="utf-8";
        meta name="viewport" content="width=device-width, initial-scale=1";

        link rel="stylesheet" href="/static/index.css";
        link rel="icon" href="/static/icon.svg" type="image/svg+xml";

        title { (format!("{title} - Tableback")) }
    }
}

/// Standard page: contents inside a centered `main` column.
pub fn page(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head { (head_assets(title)) }
        body {
            main { (body) }
        }
    }
}

/// Full-bleed page without the `main` column, for the landing screen.
pub fn shell(title: &str, body: Markup) -> Markup {
    html! {
        (DOCTYPE)
        head { (head_assets(title)) }
        body { (body) }
    }
}
