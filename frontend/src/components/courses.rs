use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj_shared::CourseSummary;
use manhaj_shared::protocol::ListCoursesRequest;

use crate::components::icons::{Clipboard, Pencil, PlayCircle};
use crate::context::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn CoursesPage() -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let session = app.session;

    let courses = RwSignal::new(Vec::<CourseSummary>::new());
    let (loading, set_loading) = signal(true);

    {
        let app = app.clone();
        spawn_local(async move {
            match app.api.send(&ListCoursesRequest).await {
                Ok(list) => courses.set(list),
                Err(e) => app.report(&e),
            }
            set_loading.set(false);
        });
    }

    let is_teacher = move || session.user.with(|u| u.as_ref().is_some_and(|u| u.is_teacher()));

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h3 class="card-title">{move || locale.t("courses.title")}</h3>

                <Show when=move || loading.get()>
                    <div class="flex justify-center py-8">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                </Show>
                <Show when=move || !loading.get() && courses.with(Vec::is_empty)>
                    <p class="text-center py-8 text-base-content/50">{move || locale.t("courses.empty")}</p>
                </Show>

                <div class="grid gap-4 md:grid-cols-2 lg:grid-cols-3">
                    <For
                        each=move || courses.get()
                        key=|course| course.id
                        children=move |course| {
                            let id = course.id;
                            view! {
                                <div class="card bg-base-200 shadow">
                                    {course.image_url.clone().map(|src| view! {
                                        <figure><img src=src alt="" class="h-40 w-full object-cover" /></figure>
                                    })}
                                    <div class="card-body p-4">
                                        <h4 class="card-title text-base">{course.name.clone()}</h4>
                                        <p class="text-sm text-base-content/70 line-clamp-2">{course.description.clone()}</p>
                                        <div class="flex gap-3 text-xs text-base-content/60">
                                            <span class="flex items-center gap-1">
                                                <PlayCircle attr:class="h-4 w-4" />
                                                {course.video_count} " " {move || locale.t("courses.videos")}
                                            </span>
                                            <span class="flex items-center gap-1">
                                                <Clipboard attr:class="h-4 w-4" />
                                                {course.quiz_count} " " {move || locale.t("courses.quizzes")}
                                            </span>
                                            {course.status.clone().map(|status| view! {
                                                <span class="badge badge-ghost badge-sm">{status}</span>
                                            })}
                                        </div>
                                        <div class="card-actions justify-end mt-2">
                                            <Show when=is_teacher>
                                                <Link route=AppRoute::CourseEditor(id) class="btn btn-sm btn-primary gap-1">
                                                    <Pencil attr:class="h-4 w-4" />
                                                    {move || locale.t("courses.edit")}
                                                </Link>
                                            </Show>
                                            <Link route=AppRoute::CoursePlayer(id) class="btn btn-sm btn-outline gap-1">
                                                <PlayCircle attr:class="h-4 w-4" />
                                                {move || locale.t("courses.preview")}
                                            </Link>
                                        </div>
                                    </div>
                                </div>
                            }
                        }
                    />
                </div>
            </div>
        </div>
    }
}
