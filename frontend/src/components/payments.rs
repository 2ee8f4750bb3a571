//! 教师收款
//!
//! 银行账户信息（账号只显示末四位）、收入汇总与结算记录。

use leptos::prelude::*;
use leptos::task::spawn_local;
use manhaj::api::PaymentsOverview;
use manhaj::forms::PaymentInfoDraft;
use manhaj_shared::{Payout, PayoutStatus};

use crate::context::use_app;
use crate::i18n::LocaleContext;

fn status_badge(status: PayoutStatus) -> (&'static str, &'static str) {
    match status {
        PayoutStatus::Pending => ("payments.status_pending", "badge badge-warning"),
        PayoutStatus::Paid => ("payments.status_paid", "badge badge-success"),
        PayoutStatus::Cancelled => ("payments.status_cancelled", "badge badge-ghost"),
    }
}

#[component]
pub fn PaymentsPage() -> impl IntoView {
    let app = use_app();
    let locale = app.locale;
    let overview = RwSignal::new(PaymentsOverview::default());
    let draft = RwSignal::new(PaymentInfoDraft::default());
    let (loading, set_loading) = signal(true);
    let (saving, set_saving) = signal(false);

    {
        let app = app.clone();
        spawn_local(async move {
            match app.api.payments_overview().await {
                Ok(loaded) => {
                    if let Some(info) = &loaded.info {
                        draft.set(PaymentInfoDraft::from_info(info));
                    }
                    overview.set(loaded);
                }
                Err(e) => app.report(&e),
            }
            set_loading.set(false);
        });
    }

    // 表单在 Show 内部，事件处理器需要可复制
    let app = StoredValue::new(app);
    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let app = app.get_value();
        let request = match draft.with_untracked(PaymentInfoDraft::validate) {
            Ok(request) => request,
            Err(e) => {
                app.report(&e);
                return;
            }
        };
        set_saving.set(true);
        spawn_local(async move {
            match app.api.send(&request).await {
                Ok(info) => {
                    draft.set(PaymentInfoDraft::from_info(&info));
                    overview.update(|o| o.info = Some(info));
                    app.toast.success(app.locale.t("common.saved"));
                }
                Err(e) => app.report(&e),
            }
            set_saving.set(false);
        });
    };

    let field = move |label: &'static str,
                      read: fn(&PaymentInfoDraft) -> String,
                      write: fn(&mut PaymentInfoDraft, String)| {
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

    let account_status = move || {
        overview.with(|o| {
            let info = o.info.as_ref()?;
            let (key, class) = if info.is_verified {
                ("payments.verified", "badge badge-success")
            } else {
                ("payments.unverified", "badge badge-warning")
            };
            let masked = info.masked_account_number().unwrap_or_default();
            Some(view! {
                <div class="flex items-center gap-3">
                    <span class="font-mono">{masked}</span>
                    <span class=class>{move || locale.t(key)}</span>
                </div>
            })
        })
    };

    let stat = move |label: &'static str, read: fn(&PaymentsOverview) -> String, accent: &'static str| {
        view! {
            <div class="stat">
                <div class="stat-title">{move || locale.t(label)}</div>
                <div class=format!("stat-value text-2xl {}", accent)>{move || overview.with(read)}</div>
            </div>
        }
    };

    view! {
        <div class="space-y-6">
            <h2 class="text-2xl font-bold">{move || locale.t("payments.title")}</h2>

            <Show
                when=move || !loading.get()
                fallback=|| view! {
                    <div class="flex justify-center py-16">
                        <span class="loading loading-spinner loading-lg text-primary"></span>
                    </div>
                }
            >
                <section class="space-y-2">
                    <h3 class="text-lg font-semibold">{move || locale.t("payments.earnings")}</h3>
                    <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                        {stat("payments.total_earnings", |o| o.earnings.total_earnings.clone(), "text-primary")}
                        {stat("payments.available", |o| o.earnings.available_for_payout.clone(), "text-success")}
                        {stat("payments.pending", |o| o.earnings.pending_payouts.clone(), "")}
                        {stat("payments.paid", |o| o.earnings.paid_payouts.clone(), "")}
                    </div>
                </section>

                <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                    <div class="card-body space-y-3">
                        <div class="flex items-center justify-between">
                            <h3 class="card-title">{move || locale.t("payments.info")}</h3>
                            {account_status}
                        </div>
                        <div class="grid md:grid-cols-2 gap-4">
                            {field("payments.bank_name", |d| d.bank_name.clone(), |d, v| d.bank_name = v)}
                            {field("payments.holder", |d| d.account_holder_name.clone(), |d, v| d.account_holder_name = v)}
                            {field("payments.account_number", |d| d.account_number.clone(), |d, v| d.account_number = v)}
                            {field("payments.iban", |d| d.iban.clone(), |d, v| d.iban = v)}
                            {field("payments.branch", |d| d.branch_name.clone(), |d, v| d.branch_name = v)}
                            {field("payments.swift", |d| d.swift_code.clone(), |d, v| d.swift_code = v)}
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

                <section class="card bg-base-100 shadow-xl">
                    <div class="card-body">
                        <h3 class="card-title">{move || locale.t("payments.payouts")}</h3>
                        <Show
                            when=move || overview.with(|o| !o.payouts.is_empty())
                            fallback=move || view! {
                                <p class="text-center py-8 text-base-content/50">{locale.t("payments.no_payouts")}</p>
                            }
                        >
                            <div class="overflow-x-auto">
                                <table class="table">
                                    <thead>
                                        <tr>
                                            <th>{move || locale.t("payments.date")}</th>
                                            <th>{move || locale.t("payments.amount")}</th>
                                            <th>{move || locale.t("payments.status")}</th>
                                            <th>{move || locale.t("payments.reference")}</th>
                                        </tr>
                                    </thead>
                                    <tbody>
                                        {move || overview.with(|o| o.payouts.iter().cloned().map(|p| payout_row(locale, p)).collect_view())}
                                    </tbody>
                                </table>
                            </div>
                        </Show>
                    </div>
                </section>
            </Show>
        </div>
    }
}

fn payout_row(locale: LocaleContext, payout: Payout) -> impl IntoView {
    let (key, class) = status_badge(payout.status);
    let date = payout.paid_at.unwrap_or(payout.created_at).date_naive().to_string();
    view! {
        <tr>
            <td>{date}</td>
            <td class="font-mono">{payout.amount}</td>
            <td><span class=class>{move || locale.t(key)}</span></td>
            <td>{payout.transfer_reference.unwrap_or_else(|| "-".to_string())}</td>
        </tr>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_has_its_own_label() {
        let labels: Vec<_> = [PayoutStatus::Pending, PayoutStatus::Paid, PayoutStatus::Cancelled]
            .into_iter()
            .map(|s| status_badge(s).0)
            .collect();
        assert_eq!(
            labels,
            ["payments.status_pending", "payments.status_paid", "payments.status_cancelled"]
        );
    }
}
