//! Dashboard Page
//!
//! Aggregate service metrics. The snapshot is fetched once per visit; on
//! failure a notice replaces the whole chart region.

use leptos::*;

use concierge::dashboard::DashboardLoader;

use crate::api::HttpTransport;
use crate::components::{CanvasSurface, ChartCanvas};

/// Dashboard page component
#[component]
pub fn Dashboard() -> impl IntoView {
    let surface = CanvasSurface::new();
    let loading = create_rw_signal(true);

    // Fetch on mount
    create_effect(move |_| {
        spawn_local(async move {
            let mut surface = surface;
            let transport = HttpTransport::from_storage();

            if let Err(e) = DashboardLoader::new().load(&transport, &mut surface).await {
                web_sys::console::error_1(&format!("Error fetching dashboard data: {}", e).into());
            }

            loading.set(false);
        });
    });

    view! {
        <div class="space-y-8">
            <div>
                <h1 class="text-3xl font-bold">"Dashboard"</h1>
                <p class="text-gray-400 mt-1">"Assistant traffic over the last seven days"</p>
            </div>

            {move || {
                if let Some(notice) = surface.notice.get() {
                    view! {
                        <div class="bg-red-900/40 border border-red-700 text-red-200 rounded-xl p-6">
                            {notice}
                        </div>
                    }.into_view()
                } else if loading.get() {
                    view! {
                        <div class="h-64 flex items-center justify-center">
                            <div class="loading-spinner w-8 h-8" />
                        </div>
                    }.into_view()
                } else {
                    view! {
                        <div class="grid md:grid-cols-2 gap-8">
                            {surface.charts.get()
                                .into_iter()
                                .map(|spec| view! { <ChartCanvas spec=spec /> })
                                .collect_view()}
                        </div>
                    }.into_view()
                }
            }}
        </div>
    }
}
