//! 界面文案查表
//!
//! 查找顺序：当前语言 -> 英文 -> 键本身。

use manhaj_shared::Language;

type Table = &'static [(&'static str, &'static str)];

/// 按语言翻译文案键
pub fn translate<'a>(language: Language, key: &'a str) -> &'a str {
    lookup(table(language), key)
        .or_else(|| lookup(EN, key))
        .unwrap_or(key)
}

fn table(language: Language) -> Table {
    match language {
        Language::En => EN,
        Language::Ar => AR,
    }
}

fn lookup(table: Table, key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

// =========================================================
// English
// =========================================================

const EN: Table = &[
    ("app.title", "Manhaj"),
    ("nav.courses", "My courses"),
    ("nav.profile", "Profile"),
    ("nav.pricing", "Lesson pricing"),
    ("nav.payments", "Payments"),
    ("nav.logout", "Log out"),
    ("nav.language", "العربية"),
    ("common.save", "Save"),
    ("common.cancel", "Cancel"),
    ("common.delete", "Delete"),
    ("common.edit", "Edit"),
    ("common.close", "Close"),
    ("common.add", "Add"),
    ("common.loading", "Loading..."),
    ("common.confirm", "Confirm"),
    ("common.saved", "Saved successfully"),
    ("common.deleted", "Deleted successfully"),
    ("common.back", "Back"),
    ("common.minutes", "min"),
    ("common.none", "None"),
    ("login.title", "Sign in"),
    ("login.email", "Email"),
    ("login.password", "Password"),
    ("login.submit", "Sign in"),
    ("login.failed", "Invalid email or password"),
    ("courses.title", "My courses"),
    ("courses.empty", "You have no courses yet."),
    ("courses.edit", "Edit structure"),
    ("courses.preview", "Preview"),
    ("courses.videos", "videos"),
    ("courses.quizzes", "quizzes"),
    ("editor.title", "Course structure"),
    ("editor.add_chapter", "Add chapter"),
    ("editor.add_section", "Add section"),
    ("editor.add_video", "Add video"),
    ("editor.add_quiz", "Add quiz"),
    ("editor.chapter_title", "Chapter title"),
    ("editor.section_title", "Section title"),
    ("editor.empty", "No chapters yet. Add the first one."),
    ("editor.empty_section", "No materials in this section."),
    ("editor.drag_hint", "Drag rows to reorder"),
    ("editor.lock", "Lock"),
    ("editor.unlock", "Unlock"),
    ("editor.locked", "Locked"),
    ("editor.stats_chapters", "Chapters"),
    ("editor.stats_sections", "Sections"),
    ("editor.stats_videos", "Videos"),
    ("editor.stats_quizzes", "Quizzes"),
    ("editor.stats_minutes", "Total minutes"),
    ("editor.reorder_failed", "Could not save the new order"),
    ("editor.lock_failed", "Could not change the lock state"),
    ("editor.view_unified", "All materials"),
    ("editor.view_by_type", "By type"),
    ("video.new", "New video"),
    ("video.edit", "Edit video"),
    ("video.title", "Title"),
    ("video.description", "Description"),
    ("video.url", "Video URL"),
    ("video.file", "Video file"),
    ("video.duration", "Duration (minutes)"),
    ("video.locked", "Locked for non-enrolled students"),
    ("quiz.new", "New quiz"),
    ("quiz.edit", "Edit quiz"),
    ("quiz.title", "Title"),
    ("quiz.description", "Description"),
    ("quiz.duration", "Duration (minutes)"),
    ("quiz.locked", "Locked for non-enrolled students"),
    ("quiz.questions", "Questions"),
    ("quiz.add_question", "Add question"),
    ("quiz.question_text", "Question text"),
    ("quiz.question_image", "Question image"),
    ("quiz.type_text", "Text"),
    ("quiz.type_image", "Image"),
    ("quiz.drop_image", "Drop an image here or click to choose"),
    ("quiz.add_option", "Add option"),
    ("quiz.option", "Option"),
    ("quiz.correct", "Correct answer"),
    ("quiz.save_question", "Save question"),
    ("quiz.save_first", "Save the quiz before adding questions"),
    ("confirm.title", "Are you sure?"),
    ("confirm.delete_chapter", "Delete this chapter with all its sections and materials?"),
    ("confirm.delete_section", "Delete this section with all its materials?"),
    ("confirm.delete_video", "Delete this video?"),
    ("confirm.delete_quiz", "Delete this quiz with all its questions?"),
    ("confirm.delete_question", "Delete this question?"),
    ("confirm.delete_price", "Delete this price?"),
    ("confirm.acknowledge", "I understand this cannot be undone"),
    ("modal.discard_title", "Discard changes?"),
    ("modal.discard_body", "You have unsaved changes. Close anyway?"),
    ("modal.discard", "Discard"),
    ("modal.keep_editing", "Keep editing"),
    ("player.previous", "Previous"),
    ("player.next", "Next"),
    ("player.locked", "This material is locked."),
    ("player.no_source", "This video has no source yet."),
    ("player.recording", "Screen recording detected. Playback is paused."),
    ("player.question", "Question"),
    ("player.of", "of"),
    ("player.empty", "This course has no materials yet."),
    ("player.no_questions", "This quiz has no questions yet."),
    ("profile.title", "Profile"),
    ("profile.first_name", "First name"),
    ("profile.last_name", "Last name"),
    ("profile.phone", "Phone number"),
    ("profile.bio", "Bio"),
    ("profile.picture", "Profile picture"),
    ("profile.upload", "Upload picture"),
    ("profile.email", "Email"),
    ("pricing.title", "Private lesson pricing"),
    ("pricing.student_type", "Student type"),
    ("pricing.school", "School student"),
    ("pricing.university", "University student"),
    ("pricing.subject", "Subject"),
    ("pricing.grade", "Grade"),
    ("pricing.price", "Price"),
    ("pricing.empty", "No prices yet."),
    ("pricing.add", "Add price"),
    ("pricing.select", "Select..."),
    ("payments.title", "Payments"),
    ("payments.info", "Bank account"),
    ("payments.bank_name", "Bank name"),
    ("payments.account_number", "Account number"),
    ("payments.holder", "Account holder name"),
    ("payments.iban", "IBAN"),
    ("payments.branch", "Branch"),
    ("payments.swift", "SWIFT code"),
    ("payments.verified", "Verified"),
    ("payments.unverified", "Pending verification"),
    ("payments.earnings", "Earnings"),
    ("payments.total_earnings", "Total earnings"),
    ("payments.pending", "Pending payouts"),
    ("payments.paid", "Paid payouts"),
    ("payments.available", "Available for payout"),
    ("payments.payouts", "Payout history"),
    ("payments.no_payouts", "No payouts yet."),
    ("payments.status_pending", "Pending"),
    ("payments.status_paid", "Paid"),
    ("payments.status_cancelled", "Cancelled"),
    ("payments.reference", "Reference"),
    ("payments.date", "Date"),
    ("payments.amount", "Amount"),
    ("payments.status", "Status"),
    ("validation.title_required", "Title is required"),
    ("validation.duration_invalid", "Duration must be a whole number of minutes"),
    ("validation.question_text_required", "Question text is required"),
    ("validation.question_image_required", "Choose an image for the question"),
    ("validation.options_min", "A question needs at least two options"),
    ("validation.option_empty", "Every option needs text"),
    ("validation.correct_required", "Mark the correct answer"),
    ("validation.correct_single", "Only one option can be correct"),
    ("validation.bank_name_required", "Bank name is required"),
    ("validation.account_number_required", "Account number is required"),
    ("validation.holder_required", "Account holder name is required"),
    ("validation.student_type_required", "Choose a student type"),
    ("validation.subject_required", "Choose a subject"),
    ("validation.grade_required", "Choose a grade for school students"),
    ("validation.grade_not_allowed", "University prices do not take a grade"),
    ("validation.price_invalid", "Price must be a positive amount"),
    ("validation.first_name_required", "First name is required"),
    ("validation.last_name_required", "Last name is required"),
    ("validation.email_required", "Email is required"),
    ("validation.password_required", "Password is required"),
    ("error.network", "Network error. Check your connection and try again."),
    ("error.unauthorized", "Your session has expired. Please sign in again."),
    ("error.generic", "Something went wrong"),
    ("error.file_read", "The selected file could not be read."),
    ("notfound.title", "Page not found"),
];

// =========================================================
// العربية
// =========================================================

const AR: Table = &[
    ("app.title", "منهج"),
    ("nav.courses", "دوراتي"),
    ("nav.profile", "الملف الشخصي"),
    ("nav.pricing", "أسعار الدروس"),
    ("nav.payments", "المدفوعات"),
    ("nav.logout", "تسجيل الخروج"),
    ("nav.language", "English"),
    ("common.save", "حفظ"),
    ("common.cancel", "إلغاء"),
    ("common.delete", "حذف"),
    ("common.edit", "تعديل"),
    ("common.close", "إغلاق"),
    ("common.add", "إضافة"),
    ("common.loading", "جارٍ التحميل..."),
    ("common.confirm", "تأكيد"),
    ("common.saved", "تم الحفظ بنجاح"),
    ("common.deleted", "تم الحذف بنجاح"),
    ("common.back", "رجوع"),
    ("common.minutes", "دقيقة"),
    ("common.none", "لا يوجد"),
    ("login.title", "تسجيل الدخول"),
    ("login.email", "البريد الإلكتروني"),
    ("login.password", "كلمة المرور"),
    ("login.submit", "دخول"),
    ("login.failed", "البريد الإلكتروني أو كلمة المرور غير صحيحة"),
    ("courses.title", "دوراتي"),
    ("courses.empty", "لا توجد دورات بعد."),
    ("courses.edit", "تعديل الهيكل"),
    ("courses.preview", "معاينة"),
    ("courses.videos", "فيديو"),
    ("courses.quizzes", "اختبار"),
    ("editor.title", "هيكل الدورة"),
    ("editor.add_chapter", "إضافة فصل"),
    ("editor.add_section", "إضافة قسم"),
    ("editor.add_video", "إضافة فيديو"),
    ("editor.add_quiz", "إضافة اختبار"),
    ("editor.chapter_title", "عنوان الفصل"),
    ("editor.section_title", "عنوان القسم"),
    ("editor.empty", "لا توجد فصول بعد. أضف الفصل الأول."),
    ("editor.empty_section", "لا توجد مواد في هذا القسم."),
    ("editor.drag_hint", "اسحب الصفوف لإعادة الترتيب"),
    ("editor.lock", "قفل"),
    ("editor.unlock", "فتح"),
    ("editor.locked", "مقفل"),
    ("editor.stats_chapters", "الفصول"),
    ("editor.stats_sections", "الأقسام"),
    ("editor.stats_videos", "الفيديوهات"),
    ("editor.stats_quizzes", "الاختبارات"),
    ("editor.stats_minutes", "إجمالي الدقائق"),
    ("editor.reorder_failed", "تعذر حفظ الترتيب الجديد"),
    ("editor.lock_failed", "تعذر تغيير حالة القفل"),
    ("editor.view_unified", "كل المواد"),
    ("editor.view_by_type", "حسب النوع"),
    ("video.new", "فيديو جديد"),
    ("video.edit", "تعديل الفيديو"),
    ("video.title", "العنوان"),
    ("video.description", "الوصف"),
    ("video.url", "رابط الفيديو"),
    ("video.file", "ملف الفيديو"),
    ("video.duration", "المدة (بالدقائق)"),
    ("video.locked", "مقفل لغير المسجلين"),
    ("quiz.new", "اختبار جديد"),
    ("quiz.edit", "تعديل الاختبار"),
    ("quiz.title", "العنوان"),
    ("quiz.description", "الوصف"),
    ("quiz.duration", "المدة (بالدقائق)"),
    ("quiz.locked", "مقفل لغير المسجلين"),
    ("quiz.questions", "الأسئلة"),
    ("quiz.add_question", "إضافة سؤال"),
    ("quiz.question_text", "نص السؤال"),
    ("quiz.question_image", "صورة السؤال"),
    ("quiz.type_text", "نص"),
    ("quiz.type_image", "صورة"),
    ("quiz.drop_image", "اسحب صورة هنا أو انقر للاختيار"),
    ("quiz.add_option", "إضافة خيار"),
    ("quiz.option", "خيار"),
    ("quiz.correct", "الإجابة الصحيحة"),
    ("quiz.save_question", "حفظ السؤال"),
    ("quiz.save_first", "احفظ الاختبار قبل إضافة الأسئلة"),
    ("confirm.title", "هل أنت متأكد؟"),
    ("confirm.delete_chapter", "حذف هذا الفصل مع جميع أقسامه ومواده؟"),
    ("confirm.delete_section", "حذف هذا القسم مع جميع مواده؟"),
    ("confirm.delete_video", "حذف هذا الفيديو؟"),
    ("confirm.delete_quiz", "حذف هذا الاختبار مع جميع أسئلته؟"),
    ("confirm.delete_question", "حذف هذا السؤال؟"),
    ("confirm.delete_price", "حذف هذا السعر؟"),
    ("confirm.acknowledge", "أفهم أن هذا الإجراء لا يمكن التراجع عنه"),
    ("modal.discard_title", "تجاهل التغييرات؟"),
    ("modal.discard_body", "لديك تغييرات غير محفوظة. هل تريد الإغلاق؟"),
    ("modal.discard", "تجاهل"),
    ("modal.keep_editing", "متابعة التعديل"),
    ("player.previous", "السابق"),
    ("player.next", "التالي"),
    ("player.locked", "هذه المادة مقفلة."),
    ("player.no_source", "لا يوجد مصدر لهذا الفيديو بعد."),
    ("player.recording", "تم اكتشاف تسجيل للشاشة. تم إيقاف التشغيل."),
    ("player.question", "السؤال"),
    ("player.of", "من"),
    ("player.empty", "لا توجد مواد في هذه الدورة بعد."),
    ("player.no_questions", "لا توجد أسئلة في هذا الاختبار بعد."),
    ("profile.title", "الملف الشخصي"),
    ("profile.first_name", "الاسم الأول"),
    ("profile.last_name", "اسم العائلة"),
    ("profile.phone", "رقم الهاتف"),
    ("profile.bio", "نبذة"),
    ("profile.picture", "الصورة الشخصية"),
    ("profile.upload", "رفع صورة"),
    ("profile.email", "البريد الإلكتروني"),
    ("pricing.title", "أسعار الدروس الخصوصية"),
    ("pricing.student_type", "نوع الطالب"),
    ("pricing.school", "طالب مدرسة"),
    ("pricing.university", "طالب جامعة"),
    ("pricing.subject", "المادة"),
    ("pricing.grade", "الصف"),
    ("pricing.price", "السعر"),
    ("pricing.empty", "لا توجد أسعار بعد."),
    ("pricing.add", "إضافة سعر"),
    ("pricing.select", "اختر..."),
    ("payments.title", "المدفوعات"),
    ("payments.info", "الحساب البنكي"),
    ("payments.bank_name", "اسم البنك"),
    ("payments.account_number", "رقم الحساب"),
    ("payments.holder", "اسم صاحب الحساب"),
    ("payments.iban", "رقم الآيبان"),
    ("payments.branch", "الفرع"),
    ("payments.swift", "رمز السويفت"),
    ("payments.verified", "موثق"),
    ("payments.unverified", "بانتظار التوثيق"),
    ("payments.earnings", "الأرباح"),
    ("payments.total_earnings", "إجمالي الأرباح"),
    ("payments.pending", "دفعات معلقة"),
    ("payments.paid", "دفعات مدفوعة"),
    ("payments.available", "المتاح للسحب"),
    ("payments.payouts", "سجل الدفعات"),
    ("payments.no_payouts", "لا توجد دفعات بعد."),
    ("payments.status_pending", "معلقة"),
    ("payments.status_paid", "مدفوعة"),
    ("payments.status_cancelled", "ملغاة"),
    ("payments.reference", "المرجع"),
    ("payments.date", "التاريخ"),
    ("payments.amount", "المبلغ"),
    ("payments.status", "الحالة"),
    ("validation.title_required", "العنوان مطلوب"),
    ("validation.duration_invalid", "يجب أن تكون المدة عدداً صحيحاً من الدقائق"),
    ("validation.question_text_required", "نص السؤال مطلوب"),
    ("validation.question_image_required", "اختر صورة للسؤال"),
    ("validation.options_min", "يحتاج السؤال إلى خيارين على الأقل"),
    ("validation.option_empty", "يجب أن يحتوي كل خيار على نص"),
    ("validation.correct_required", "حدد الإجابة الصحيحة"),
    ("validation.correct_single", "يمكن أن يكون خيار واحد فقط صحيحاً"),
    ("validation.bank_name_required", "اسم البنك مطلوب"),
    ("validation.account_number_required", "رقم الحساب مطلوب"),
    ("validation.holder_required", "اسم صاحب الحساب مطلوب"),
    ("validation.student_type_required", "اختر نوع الطالب"),
    ("validation.subject_required", "اختر المادة"),
    ("validation.grade_required", "اختر الصف لطلاب المدارس"),
    ("validation.grade_not_allowed", "أسعار الجامعة لا تحتاج إلى صف"),
    ("validation.price_invalid", "يجب أن يكون السعر مبلغاً موجباً"),
    ("validation.first_name_required", "الاسم الأول مطلوب"),
    ("validation.last_name_required", "اسم العائلة مطلوب"),
    ("validation.email_required", "البريد الإلكتروني مطلوب"),
    ("validation.password_required", "كلمة المرور مطلوبة"),
    ("error.network", "خطأ في الشبكة. تحقق من اتصالك وحاول مرة أخرى."),
    ("error.unauthorized", "انتهت جلستك. يرجى تسجيل الدخول مرة أخرى."),
    ("error.generic", "حدث خطأ ما"),
    ("error.file_read", "تعذرت قراءة الملف المحدد."),
    ("notfound.title", "الصفحة غير موجودة"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_falls_back_to_key() {
        assert_eq!(translate(Language::En, "player.next"), "Next");
        assert_eq!(translate(Language::Ar, "player.next"), "التالي");
        assert_eq!(translate(Language::Ar, "no.such.key"), "no.such.key");
    }

    #[test]
    fn test_tables_cover_the_same_keys() {
        for (key, _) in EN {
            assert!(lookup(AR, key).is_some(), "missing arabic text for {}", key);
        }
        for (key, _) in AR {
            assert!(lookup(EN, key).is_some(), "missing english text for {}", key);
        }
    }

    #[test]
    fn test_tables_have_no_duplicate_keys() {
        let mut keys: Vec<&str> = EN.iter().map(|(k, _)| *k).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }
}
