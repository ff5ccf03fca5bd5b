//! Detail page at `/detail/:id`.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::use_params_map;

use crate::app::AppServices;
use crate::net::detail_loader::DetailLoader;
use crate::state::detail::{DetailState, DetailView};
use crate::util::mirror::mirror_store;

/// Reads the item named by the route parameter and re-reads whenever the
/// parameter changes.
#[component]
pub fn DetailPage() -> impl IntoView {
    let services = expect_context::<AppServices>();
    let params = use_params_map();

    let loader = services.try_with_value(|s| Rc::new(DetailLoader::new(s.docs.clone(), s.collection.clone())));
    let detail = loader
        .as_ref()
        .map_or_else(|| RwSignal::new(DetailState::default()), |l| mirror_store(&l.state()));
    let loader = StoredValue::new_local(loader);

    let page_title = move || {
        detail.with(|d| d.item().map_or_else(|| "Disney+".to_owned(), |item| format!("{} | Disney+", item.info.title)))
    };

    Effect::new(move || {
        let Some(id) = params.read().get("id") else {
            return;
        };
        let Some(loader) = loader.get_value() else {
            return;
        };
        leptos::task::spawn_local(async move {
            loader.load(&id).await;
        });
    });

    view! {
        <Title text=page_title/>
        <div class="detail-page">
            {move || match detail.get().view {
                DetailView::Empty => view! { <div class="detail-page__empty"></div> }.into_any(),
                DetailView::NotFound => {
                    view! { <p class="detail-page__missing">"This title is not available."</p> }.into_any()
                }
                DetailView::Loaded(item) => {
                    let info = item.info;
                    view! {
                        <div class="detail-page__background">
                            <img alt=info.title.clone() src=info.background_img/>
                        </div>
                        <div class="detail-page__title-img">
                            <img alt=info.title src=info.title_img/>
                        </div>
                        <div class="detail-page__meta">
                            <div class="detail-page__controls">
                                <button class="detail-page__play">"Play"</button>
                                <button class="detail-page__trailer">"Trailer"</button>
                            </div>
                            <p class="detail-page__subtitle">{info.sub_title}</p>
                            <p class="detail-page__description">{info.description}</p>
                        </div>
                    }
                        .into_any()
                }
            }}
        </div>
    }
}
