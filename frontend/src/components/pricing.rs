//! 私教课定价
//!
//! 教师按学生类型、科目（学校学生还需年级）设置价格。增删改后重新拉取列表。

use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::api::PricingCatalog;
use manhaj::forms::PriceDraft;
use manhaj_shared::{
    CreatePriceRequest, DeletePriceRequest, LessonPrice, StudentType, UpdatePriceRequest,
};

use crate::components::confirm_dialog::ConfirmDialog;
use crate::components::icons::{Pencil, Plus, Trash};
use crate::context::{AppContext, use_app};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PriceEdit {
    New,
    Existing(u64),
}

fn student_type_key(student_type: StudentType) -> &'static str {
    match student_type {
        StudentType::SchoolStudent => "pricing.school",
        StudentType::UniversityStudent => "pricing.university",
    }
}

fn parse_id(value: &str) -> Option<u64> {
    value.parse().ok()
}

#[derive(Clone, Copy)]
struct PricingState {
    catalog: RwSignal<PricingCatalog>,
    loading: RwSignal<bool>,
    editing: RwSignal<Option<PriceEdit>>,
    draft: RwSignal<PriceDraft>,
    pending_delete: RwSignal<Option<u64>>,
    app: StoredValue<AppContext>,
}

impl PricingState {
    fn new(app: AppContext) -> Self {
        Self {
            catalog: RwSignal::new(PricingCatalog::default()),
            loading: RwSignal::new(true),
            editing: RwSignal::new(None),
            draft: RwSignal::new(PriceDraft::default()),
            pending_delete: RwSignal::new(None),
            app: StoredValue::new(app),
        }
    }

    async fn reload(self) {
        let app = self.app.get_value();
        match app.api.pricing_catalog().await {
            Ok(catalog) => self.catalog.set(catalog),
            Err(e) => app.report(&e),
        }
        self.loading.set(false);
    }

    fn open(&self, edit: PriceEdit, price: Option<&LessonPrice>) {
        self.draft.set(price.map(PriceDraft::from_price).unwrap_or_default());
        self.editing.set(Some(edit));
    }

    fn save(self) {
        let app = self.app.get_value();
        let Some(edit) = self.editing.get_untracked() else {
            return;
        };
        let input = match self.draft.with_untracked(PriceDraft::validate) {
            Ok(input) => input,
            Err(e) => {
                app.report(&e);
                return;
            }
        };
        spawn_local(async move {
            let result = match edit {
                PriceEdit::New => app.api.send(&CreatePriceRequest { input }).await,
                PriceEdit::Existing(price_id) => {
                    app.api.send(&UpdatePriceRequest { price_id, input }).await
                }
            };
            match result {
                Ok(_) => {
                    self.editing.set(None);
                    app.toast.success(app.locale.t("common.saved"));
                    self.reload().await;
                }
                Err(e) => app.report(&e),
            }
        });
    }

    fn confirm_delete(self) {
        let Some(price_id) = self.pending_delete.get_untracked() else {
            return;
        };
        self.pending_delete.set(None);
        let app = self.app.get_value();
        spawn_local(async move {
            match app.api.send(&DeletePriceRequest { price_id }).await {
                Ok(_) => {
                    app.toast.success(app.locale.t("common.deleted"));
                    self.reload().await;
                }
                Err(e) => app.report(&e),
            }
        });
    }
}

#[component]
pub fn PricingPage() -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let state = PricingState::new(app);
    spawn_local(state.reload());

    let subject_name = move |price: &LessonPrice| {
        price.subject_name.clone().unwrap_or_else(|| {
            state.catalog.with(|c| {
                c.subjects
                    .iter()
                    .find(|s| s.id == price.subject)
                    .map(|s| s.name(locale.current()).to_string())
                    .unwrap_or_default()
            })
        })
    };
    let grade_name = move |price: &LessonPrice| {
        let grade = price.grade?;
        price.grade_name.clone().or_else(|| {
            state.catalog.with(|c| {
                c.grades
                    .iter()
                    .find(|g| g.id == grade)
                    .map(|g| g.name(locale.current()).to_string())
            })
        })
    };

    let rows = move || {
        state.catalog.with(|c| c.prices.clone()).into_iter().map(|price| {
            let price_id = price.id;
            let subject = subject_name(&price);
            let grade = grade_name(&price).unwrap_or_else(|| "-".to_string());
            let stored = StoredValue::new(price.clone());
            view! {
                <tr>
                    <td>{move || locale.t(student_type_key(price.student_type))}</td>
                    <td>{subject}</td>
                    <td>{grade}</td>
                    <td class="font-mono">{price.price.clone()}</td>
                    <td class="text-end">
                        <button
                            class="btn btn-ghost btn-xs btn-square"
                            on:click=move |_| stored.with_value(|p| state.open(PriceEdit::Existing(price_id), Some(p)))
                        >
                            <Pencil attr:class="h-4 w-4" />
                        </button>
                        <button
                            class="btn btn-ghost btn-xs btn-square text-error"
                            on:click=move |_| state.pending_delete.set(Some(price_id))
                        >
                            <Trash attr:class="h-4 w-4" />
                        </button>
                    </td>
                </tr>
            }
        }).collect_view()
    };

    let delete_message = Signal::derive(move || {
        state
            .pending_delete
            .get()
            .map(|_| "confirm.delete_price".to_string())
    });

    view! {
        <div class="space-y-6">
            <div class="flex items-center justify-between">
                <h2 class="text-2xl font-bold">{move || locale.t("pricing.title")}</h2>
                <button class="btn btn-primary btn-sm gap-1" on:click=move |_| state.open(PriceEdit::New, None)>
                    <Plus attr:class="h-4 w-4" /> {move || locale.t("pricing.add")}
                </button>
            </div>

            <Show when=move || state.editing.get().is_some()>
                <PriceForm state=state />
            </Show>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <Show
                        when=move || !state.loading.get()
                        fallback=|| view! {
                            <div class="flex justify-center py-8">
                                <span class="loading loading-spinner loading-lg text-primary"></span>
                            </div>
                        }
                    >
                        <Show
                            when=move || state.catalog.with(|c| !c.prices.is_empty())
                            fallback=move || view! {
                                <p class="text-center py-8 text-base-content/50">{locale.t("pricing.empty")}</p>
                            }
                        >
                            <div class="overflow-x-auto">
                                <table class="table">
                                    <thead>
                                        <tr>
                                            <th>{move || locale.t("pricing.student_type")}</th>
                                            <th>{move || locale.t("pricing.subject")}</th>
                                            <th>{move || locale.t("pricing.grade")}</th>
                                            <th>{move || locale.t("pricing.price")}</th>
                                            <th></th>
                                        </tr>
                                    </thead>
                                    <tbody>{rows}</tbody>
                                </table>
                            </div>
                        </Show>
                    </Show>
                </div>
            </div>
        </div>

        <ConfirmDialog
            message=delete_message
            on_confirm=move |_| state.confirm_delete()
            on_cancel=move |_| state.pending_delete.set(None)
        />
    }
}

/// 新建与编辑共用的表单；大学学生不显示年级
#[component]
fn PriceForm(state: PricingState) -> impl IntoView {
    let locale = use_app().locale;
    let draft = state.draft;
    let is_school = move || draft.with(|d| d.student_type == Some(StudentType::SchoolStudent));

    let subject_options = move || {
        let language = locale.current();
        state.catalog.with(|c| {
            c.subjects
                .iter()
                .map(|s| {
                    let id = s.id;
                    view! {
                        <option value=id.to_string() selected=move || draft.with(|d| d.subject == Some(id))>
                            {s.name(language).to_string()}
                        </option>
                    }
                })
                .collect_view()
        })
    };
    let grade_options = move || {
        let language = locale.current();
        state.catalog.with(|c| {
            let mut grades = c.grades.clone();
            grades.sort_by_key(|g| g.order);
            grades
                .into_iter()
                .map(|g| {
                    let id = g.id;
                    view! {
                        <option value=id.to_string() selected=move || draft.with(|d| d.grade == Some(id))>
                            {g.name(language).to_string()}
                        </option>
                    }
                })
                .collect_view()
        })
    };

    view! {
        <form
            class="card bg-base-100 shadow-xl"
            on:submit=move |ev: leptos::web_sys::SubmitEvent| {
                ev.prevent_default();
                state.save();
            }
        >
            <div class="card-body grid md:grid-cols-4 gap-4 items-end">
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("pricing.student_type")}</span></label>
                    <select
                        class="select select-bordered"
                        on:change=move |ev| {
                            let student_type = StudentType::from_code(&event_target_value(&ev));
                            draft.update(|d| {
                                d.student_type = student_type;
                                if student_type != Some(StudentType::SchoolStudent) {
                                    d.grade = None;
                                }
                            });
                        }
                    >
                        <option value="" selected=move || draft.with(|d| d.student_type.is_none())>
                            {move || locale.t("pricing.select")}
                        </option>
                        {[StudentType::SchoolStudent, StudentType::UniversityStudent]
                            .into_iter()
                            .map(|t| view! {
                                <option value=t.as_str() selected=move || draft.with(|d| d.student_type == Some(t))>
                                    {move || locale.t(student_type_key(t))}
                                </option>
                            })
                            .collect_view()}
                    </select>
                </div>
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("pricing.subject")}</span></label>
                    <select
                        class="select select-bordered"
                        on:change=move |ev| {
                            let subject = parse_id(&event_target_value(&ev));
                            draft.update(|d| d.subject = subject);
                        }
                    >
                        <option value="">{move || locale.t("pricing.select")}</option>
                        {subject_options}
                    </select>
                </div>
                <Show when=is_school>
                    <div class="form-control">
                        <label class="label"><span class="label-text">{move || locale.t("pricing.grade")}</span></label>
                        <select
                            class="select select-bordered"
                            on:change=move |ev| {
                                let grade = parse_id(&event_target_value(&ev));
                                draft.update(|d| d.grade = grade);
                            }
                        >
                            <option value="">{move || locale.t("pricing.select")}</option>
                            {grade_options}
                        </select>
                    </div>
                </Show>
                <div class="form-control">
                    <label class="label"><span class="label-text">{move || locale.t("pricing.price")}</span></label>
                    <input
                        type="text"
                        inputmode="decimal"
                        class="input input-bordered"
                        prop:value=move || draft.with(|d| d.price.clone())
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            draft.update(|d| d.price = value);
                        }
                    />
                </div>
                <div class="flex gap-2 md:col-span-4 justify-end">
                    <button type="button" class="btn" on:click=move |_| state.editing.set(None)>
                        {move || locale.t("common.cancel")}
                    </button>
                    <button type="submit" class="btn btn-primary">{move || locale.t("common.save")}</button>
                </div>
            </div>
        </form>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_ignores_placeholder() {
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("12"), Some(12));
    }

    #[test]
    fn student_types_have_labels() {
        assert_eq!(student_type_key(StudentType::SchoolStudent), "pricing.school");
        assert_eq!(student_type_key(StudentType::UniversityStudent), "pricing.university");
    }
}
