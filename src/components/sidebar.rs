use leptos::prelude::*;

use crate::browser::toggle_sidebar;

#[component]
pub fn Sidebar() -> impl IntoView {
    view! {
        <nav id="sidebar" class="sidebar">
            <div class="sidebar-header">
                <h1 class="sidebar-title">"LiftLog"</h1>
                <p class="sidebar-subtitle">"Workout Tracker"</p>
            </div>
            <ul class="nav-list">
                <li class="nav-item">
                    <a href="#/home" class="nav-link">"Home"</a>
                </li>
                <li class="nav-item">
                    <a href="#/record" class="nav-link">"Log Workout"</a>
                </li>
                <li class="nav-item">
                    <a href="#/stats" class="nav-link">"Statistics"</a>
                </li>
                <li class="nav-item">
                    <a href="#/settings" class="nav-link">"Settings"</a>
                </li>
            </ul>
        </nav>
        <div id="sidebar-overlay" class="sidebar-overlay" on:click=move |_| toggle_sidebar()></div>
    }
}
