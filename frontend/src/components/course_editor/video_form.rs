use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::VideoDraft;
use manhaj_shared::Video;

use super::editor_state::use_editor;
use crate::context::use_app;
use crate::web::file::{read_upload, selected_file};

/// 新建或编辑视频；外部链接与上传文件二选一，都可以为空
#[component]
pub fn VideoForm(section_id: u64, #[prop(optional)] video: Option<Video>) -> impl IntoView {
    let state = use_editor();
    let app = use_app();
    let locale = app.locale;

    let video_id = video.as_ref().map(|v| v.id);
    let draft = RwSignal::new(video.as_ref().map(VideoDraft::from_video).unwrap_or_default());
    let (submitting, set_submitting) = signal(false);
    let (reading_file, set_reading_file) = signal(false);

    let edit = move |f: &dyn Fn(&mut VideoDraft)| {
        draft.update(|d| f(d));
        state.mark_dirty();
    };

    let on_file = move |ev: leptos::ev::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        set_reading_file.set(true);
        let app = state.app();
        spawn_local(async move {
            match read_upload(&file).await {
                Ok(upload) => {
                    draft.update(|d| d.file = Some(upload));
                    state.mark_dirty();
                }
                Err(e) => app.report(&e),
            }
            set_reading_file.set(false);
        });
    };

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let payload = match draft.with_untracked(VideoDraft::validate) {
            Ok(payload) => payload,
            Err(e) => {
                app.report(&e);
                return;
            }
        };

        set_submitting.set(true);
        let app = app.clone();
        spawn_local(async move {
            let result = match video_id {
                Some(id) => app.api.update_video(id, &payload).await,
                None => app.api.create_video(section_id, &payload).await,
            };
            set_submitting.set(false);
            match result {
                Ok(_) => state.finish_material().await,
                Err(e) => app.report(&e),
            }
        });
    };

    view! {
        <form class="space-y-3" on:submit=on_submit>
            <div class="form-control">
                <label class="label"><span class="label-text">{move || locale.t("video.title")}</span></label>
                <input
                    type="text"
                    class="input input-bordered w-full"
                    prop:value=move || draft.with(|d| d.title.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d| d.title = value.clone());
                    }
                />
            </div>
            <div class="form-control">
                <label class="label"><span class="label-text">{move || locale.t("video.description")}</span></label>
                <textarea
                    class="textarea textarea-bordered w-full"
                    prop:value=move || draft.with(|d| d.description.clone())
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        edit(&|d| d.description = value.clone());
                    }
                ></textarea>
            </div>
            <div class="grid grid-cols-2 gap-4">
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("video.url")}</span></label>
                    <input
                        type="url"
                        class="input input-bordered w-full"
                        placeholder="https://"
                        prop:value=move || draft.with(|d| d.video_url.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(&|d| d.video_url = value.clone());
                        }
                    />
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("video.file")}</span></label>
                    <input
                        type="file"
                        accept="video/*"
                        class="file-input file-input-bordered w-full"
                        on:change=on_file
                    />
                    <label class="label">
                        <span class="label-text-alt text-base-content/60">
                            {move || draft.with(|d| d.file.as_ref().map(|f| f.name.clone()))}
                        </span>
                    </label>
                </div>
            </div>
            <div class="grid grid-cols-2 gap-4 items-end">
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("video.duration")}</span></label>
                    <input
                        type="number"
                        min="0"
                        class="input input-bordered w-full"
                        prop:value=move || draft.with(|d| d.duration.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            edit(&|d| d.duration = value.clone());
                        }
                    />
                </div>
                <label class="label cursor-pointer justify-start gap-3">
                    <input
                        type="checkbox"
                        class="toggle toggle-warning"
                        prop:checked=move || draft.with(|d| d.is_locked)
                        on:change=move |ev| {
                            let checked = event_target_checked(&ev);
                            edit(&|d| d.is_locked = checked);
                        }
                    />
                    <span class="label-text">{move || locale.t("video.locked")}</span>
                </label>
            </div>
            <div class="modal-action">
                <button
                    type="submit"
                    class="btn btn-primary"
                    disabled=move || submitting.get() || reading_file.get()
                >
                    <Show when=move || submitting.get()>
                        <span class="loading loading-spinner loading-sm"></span>
                    </Show>
                    {move || locale.t("common.save")}
                </button>
            </div>
        </form>
    }
}
