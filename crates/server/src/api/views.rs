//! 仓储记录到 JSON 视图的转换。

use collegejump_api_types::views::{
    AnnouncementView, AssignmentView, DocumentSummary, SemesterSummary, SubmissionSummary,
    UserSummary, WeekSummary, WeekView,
};

use crate::repository::{
    AnnouncementRecord, AssignmentRecord, DocumentRecord, SemesterRecord, SubmissionRecord,
    UserRecord, WeekRecord,
};

pub fn user_summary(user: &UserRecord) -> UserSummary {
    UserSummary {
        id: user.id.into_inner(),
        name: user.name.clone(),
        email: user.email.clone(),
        admin: user.admin,
    }
}

pub fn announcement_view(announcement: AnnouncementRecord) -> AnnouncementView {
    AnnouncementView {
        id: announcement.id.into_inner(),
        author: announcement.author,
        title: announcement.title,
        content: announcement.content,
        timestamp: announcement.timestamp,
    }
}

pub fn semester_summary(semester: &SemesterRecord) -> SemesterSummary {
    SemesterSummary {
        id: semester.id.into_inner(),
        name: semester.name.clone(),
        order: semester.order,
    }
}

pub fn week_summary(week: &WeekRecord) -> WeekSummary {
    WeekSummary {
        id: week.id.into_inner(),
        week_num: week.week_num,
        header: week.header.clone(),
    }
}

pub fn week_view(
    week: WeekRecord,
    assignment: Option<AssignmentRecord>,
    documents: Vec<DocumentRecord>,
) -> WeekView {
    WeekView {
        id: week.id.into_inner(),
        semester_id: week.semester_id.into_inner(),
        week_num: week.week_num,
        header: week.header,
        intro: week.intro,
        assignment: assignment.map(|assignment| AssignmentView {
            id: assignment.id.into_inner(),
            name: assignment.name,
            instructions: assignment.instructions,
        }),
        documents: documents
            .into_iter()
            .map(|document| DocumentSummary {
                id: document.id.into_inner(),
                name: document.name,
                size: document.size,
            })
            .collect(),
    }
}

pub fn submission_summary(submission: SubmissionRecord, author: &UserRecord) -> SubmissionSummary {
    SubmissionSummary {
        id: submission.id.into_inner(),
        assignment_id: submission.assignment_id.into_inner(),
        author: user_summary(author),
        timestamp: submission.timestamp,
        text: submission.text,
        attachment_name: submission.filename,
    }
}

/// 学生查看周页面的地址。
pub fn week_path(semester_id: i32, week_num: i32) -> String {
    format!("/semester/{semester_id}/week/{week_num}")
}
