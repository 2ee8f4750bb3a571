use leptos::prelude::*;
use manhaj::reorder::{DragPayload, DragPhase, ItemRef, ReorderScope};
use web_sys::DragEvent;

use super::editor_state::use_editor;

/// 可拖拽的行
///
/// 行可以嵌套（章节包含小节，小节包含材料）。只有拖拽来源与本行同一作用域时
/// 才处理 dragover / drop 并阻止冒泡，否则交给外层的行处理。
#[component]
pub fn DragRow(
    item: ItemRef,
    scope: ReorderScope,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let state = use_editor();

    let on_dragstart = move |ev: DragEvent| {
        ev.stop_propagation();
        if !state.begin_drag(DragPayload { item, scope }) {
            ev.prevent_default();
            return;
        }
        if let Some(transfer) = ev.data_transfer() {
            transfer.set_effect_allowed("move");
            // Firefox 需要设置数据才会开始拖拽
            let _ = transfer.set_data("text/plain", &item.to_string());
        }
    };

    let on_dragover = move |ev: DragEvent| {
        if state.accepts(scope) {
            ev.prevent_default();
            ev.stop_propagation();
        }
    };

    let on_drop = move |ev: DragEvent| {
        if state.accepts(scope) {
            ev.prevent_default();
            ev.stop_propagation();
            state.drop_on(item, scope);
        }
    };

    let row_class = move || {
        let mut classes = class.clone();
        if state.is_dragged(item) {
            classes.push_str(" opacity-40");
        }
        if state.phase(scope) == DragPhase::Resolving {
            classes.push_str(" cursor-wait");
        }
        classes
    };

    view! {
        <div
            draggable="true"
            class=row_class
            on:dragstart=on_dragstart
            on:dragover=on_dragover
            on:drop=on_drop
            on:dragend=move |_| state.cancel_drag()
        >
            {children()}
        </div>
    }
}
