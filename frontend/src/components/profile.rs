use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::forms::ProfileDraft;

use crate::auth::refresh_user;
use crate::context::use_app;
use crate::web::file::{is_image, read_upload, selected_file};

/// 个人资料：姓名、电话、简介与头像
#[component]
pub fn ProfilePage() -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let session = app.session;

    let draft = RwSignal::new(
        session
            .user
            .with_untracked(|u| u.as_ref().map(ProfileDraft::from_user))
            .unwrap_or_default(),
    );
    let (saving, set_saving) = signal(false);
    let (uploading, set_uploading) = signal(false);

    let on_submit = {
        let app = app.clone();
        move |ev: leptos::web_sys::SubmitEvent| {
            ev.prevent_default();
            let Some(user_id) = session.user.with_untracked(|u| u.as_ref().map(|u| u.id)) else {
                return;
            };
            let request = match draft.with_untracked(|d| d.validate(user_id)) {
                Ok(request) => request,
                Err(e) => {
                    app.report(&e);
                    return;
                }
            };
            set_saving.set(true);
            let app = app.clone();
            spawn_local(async move {
                match app.api.send(&request).await {
                    Ok(_) => {
                        refresh_user(app.session, &app.api).await;
                        app.toast.success(app.locale.t("common.saved"));
                    }
                    Err(e) => app.report(&e),
                }
                set_saving.set(false);
            });
        }
    };

    let on_picture = move |ev: leptos::ev::Event| {
        let Some(file) = selected_file(&ev) else {
            return;
        };
        if !is_image(&file) {
            return;
        }
        let Some(user_id) = session.user.with_untracked(|u| u.as_ref().map(|u| u.id)) else {
            return;
        };
        set_uploading.set(true);
        let app = app.clone();
        spawn_local(async move {
            let result = match read_upload(&file).await {
                Ok(upload) => app.api.upload_profile_picture(user_id, upload).await,
                Err(e) => Err(e),
            };
            match result {
                Ok(_) => {
                    refresh_user(app.session, &app.api).await;
                    app.toast.success(app.locale.t("common.saved"));
                }
                Err(e) => app.report(&e),
            }
            set_uploading.set(false);
        });
    };

    let avatar = move || {
        session.user.with(|u| {
            let user = u.as_ref()?;
            Some(match &user.profile_picture {
                Some(src) => view! { <img src=src.clone() alt="" /> }.into_any(),
                None => {
                    let initial = user.display_name().chars().next().unwrap_or('?');
                    view! {
                        <div class="bg-neutral text-neutral-content flex items-center justify-center text-3xl">
                            {initial.to_string()}
                        </div>
                    }
                    .into_any()
                }
            })
        })
    };

    let text_field = move |label: &'static str, read: fn(&ProfileDraft) -> String, write: fn(&mut ProfileDraft, String)| {
        view! {
            <div class="form-control">
                <label class="label"><span class="label-text">{move || locale.t(label)}</span></label>
                <input
                    type="text"
                    class="input input-bordered w-full"
                    prop:value=move || draft.with(read)
                    on:input=move |ev| {
                        let value = event_target_value(&ev);
                        draft.update(|d| write(d, value));
                    }
                />
            </div>
        }
    };

    view! {
        <div class="max-w-2xl mx-auto space-y-6">
            <h2 class="text-2xl font-bold">{move || locale.t("profile.title")}</h2>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body flex-row items-center gap-6">
                    <div class="avatar">
                        <div class="w-24 rounded-full overflow-hidden">{avatar}</div>
                    </div>
                    <div class="space-y-2">
                        <p class="font-semibold">{move || session.user.with(|u| u.as_ref().map(|u| u.display_name()))}</p>
                        <p class="text-sm text-base-content/60">
                            {move || locale.t("profile.email")} ": "
                            {move || session.user.with(|u| u.as_ref().map(|u| u.email.clone()))}
                        </p>
                        <label class="btn btn-sm btn-outline">
                            <Show when=move || uploading.get()>
                                <span class="loading loading-spinner loading-xs"></span>
                            </Show>
                            {move || locale.t("profile.upload")}
                            <input type="file" accept="image/*" class="hidden" on:change=on_picture />
                        </label>
                    </div>
                </div>
            </div>

            <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                <div class="card-body space-y-3">
                    <div class="grid md:grid-cols-2 gap-4">
                        {text_field("profile.first_name", |d| d.first_name.clone(), |d, v| d.first_name = v)}
                        {text_field("profile.last_name", |d| d.last_name.clone(), |d, v| d.last_name = v)}
                    </div>
                    {text_field("profile.phone", |d| d.phone_number.clone(), |d, v| d.phone_number = v)}
                    <div class="form-control">
                        <label class="label"><span class="label-text">{move || locale.t("profile.bio")}</span></label>
                        <textarea
                            class="textarea textarea-bordered w-full"
                            rows="4"
                            prop:value=move || draft.with(|d| d.bio.clone())
                            on:input=move |ev| {
                                let value = event_target_value(&ev);
                                draft.update(|d| d.bio = value);
                            }
                        ></textarea>
                    </div>
                    <div class="card-actions justify-end">
                        <button type="submit" class="btn btn-primary" disabled=move || saving.get()>
                            <Show when=move || saving.get()>
                                <span class="loading loading-spinner loading-sm"></span>
                            </Show>
                            {move || locale.t("common.save")}
                        </button>
                    </div>
                </div>
            </form>
        </div>
    }
}
