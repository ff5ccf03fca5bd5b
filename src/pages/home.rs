//! Catalog page at `/home`: banner strip plus the four carousels.

use leptos::prelude::*;

use crate::app::AppServices;
use crate::components::carousel::Carousel;
use crate::net::catalog_sync::CatalogSync;
use crate::state::catalog::{CatalogState, ItemKind};
use crate::state::store::Store;
use crate::util::mirror::mirror_store;

const BANNERS: [&str; 4] = [
    "/images/slider-badging.jpg",
    "/images/slider-scale.jpg",
    "/images/slider-badag.jpg",
    "/images/slider-scales.jpg",
];

/// Hosts a [`CatalogSync`] for as long as the page is mounted, so leaving
/// the page closes the collection listener.
#[component]
pub fn HomePage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let (writer, reader) = Store::new(CatalogState::default());
    let catalog = mirror_store(&reader);

    let sync = services.try_with_value(|s| CatalogSync::attach(s.docs.clone(), s.collection.clone(), &s.session, writer));
    StoredValue::new_local(sync);

    view! {
        <div class="home-page">
            <div class="home-page__banners">
                {BANNERS
                    .iter()
                    .map(|src| view! { <img class="home-page__banner" src=*src alt=""/> })
                    .collect::<Vec<_>>()}
            </div>
            {move || {
                let state = catalog.get();
                ItemKind::ALL
                    .iter()
                    .map(|kind| view! { <Carousel kind=*kind items=state.bucket(*kind).to_vec()/> })
                    .collect::<Vec<_>>()
            }}
        </div>
    }
}
