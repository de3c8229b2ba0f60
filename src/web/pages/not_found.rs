use maud::{html, Markup};

use crate::components::{Alert, BaseLayout};

/// Page for a slug that no post has.
#[must_use]
pub fn render_not_found_page() -> Markup {
    let content = html! {
        section class="not-found" {
            h1 { "Post não encontrado" }
            p {
                "O post que você procura não existe ou foi removido. "
                a href="/" { "Voltar para a home" }
            }
        }
    };

    BaseLayout::new("Post não encontrado | spacetraveling").render(content)
}

/// Page shown when the content API cannot produce a page we have no copy of.
#[must_use]
pub fn render_error_page(message: &str) -> Markup {
    let content = html! {
        (Alert::error(message).with_action("Voltar para a home", "/"))
    };

    BaseLayout::new("Erro | spacetraveling").render(content)
}
