use dropvault_app_file_manager::{FileManagerApp, ThemeProvider};
use leptos::*;
use leptos_meta::*;
use platform_host_web::build_host_services;

#[component]
pub fn SiteApp() -> impl IntoView {
    provide_meta_context();

    view! {
        <Title text="DropVault" />
        <Meta name="description" content="Drop files in, browse them, and preview them in place." />

        <main class="site-root">
            <FileManagerEntry />
        </main>
    }
}

#[component]
pub fn FileManagerEntry() -> impl IntoView {
    let host_services = build_host_services();
    let prefs = host_services.prefs.clone();

    view! {
        <ThemeProvider prefs=prefs>
            <FileManagerApp host_services=host_services />
        </ThemeProvider>
    }
}
