//! One horizontal row of catalog cards.

use leptos::prelude::*;

use crate::state::catalog::{CatalogItem, ItemKind};
use crate::util::routes::Route;

#[component]
pub fn Carousel(kind: ItemKind, items: Vec<CatalogItem>) -> impl IntoView {
    view! {
        <section class="carousel" data-kind=kind.as_str()>
            <h4 class="carousel__heading">{kind.heading()}</h4>
            <div class="carousel__track">
                {items
                    .into_iter()
                    .map(|item| {
                        let href = Route::Detail(item.id.clone()).path();
                        let title = item.info.title.clone();
                        view! {
                            <a class="carousel__card" href=href title=title.clone()>
                                <img src=item.info.card_img alt=title.clone()/>
                            </a>
                        }
                    })
                    .collect::<Vec<_>>()}
            </div>
        </section>
    }
}
