use axum::response::Html;
use tera::{Context, Tera};

pub mod session;

pub use session::{finish_detached, load_study, persist_study, save_study};

pub fn render_template(tera: &Tera, template_name: &str, context: Context) -> Html<String> {
    Html(tera.render(template_name, &context).unwrap_or_else(|e| {
        log::error!("Error rendering template {}: {:?}", template_name, e);
        format!("Error rendering template: {}", template_name)
    }))
}
