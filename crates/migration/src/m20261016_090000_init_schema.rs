use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(User::Table)
                    .if_not_exists()
                    .col(pk_auto(User::Id))
                    .col(string_len(User::Name, 100))
                    // Stored lowercased by the application, so this index is
                    // effectively case-insensitive.
                    .col(string_len(User::Email, 255).unique_key())
                    .col(string_len(User::PasswordHash, 255))
                    .col(boolean(User::Admin).default(false))
                    .col(timestamp(User::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Semester::Table)
                    .if_not_exists()
                    .col(pk_auto(Semester::Id))
                    .col(string_len(Semester::Name, 200))
                    .col(integer(Semester::SortOrder).default(0))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Enrollment::Table)
                    .if_not_exists()
                    .col(integer(Enrollment::UserId))
                    .col(integer(Enrollment::SemesterId))
                    .primary_key(
                        Index::create()
                            .col(Enrollment::UserId)
                            .col(Enrollment::SemesterId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment-user_id")
                            .from(Enrollment::Table, Enrollment::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-enrollment-semester_id")
                            .from(Enrollment::Table, Enrollment::SemesterId)
                            .to(Semester::Table, Semester::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Mentorship::Table)
                    .if_not_exists()
                    .col(integer(Mentorship::MentorId))
                    .col(integer(Mentorship::MenteeId))
                    .primary_key(
                        Index::create()
                            .col(Mentorship::MentorId)
                            .col(Mentorship::MenteeId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mentorship-mentor_id")
                            .from(Mentorship::Table, Mentorship::MentorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-mentorship-mentee_id")
                            .from(Mentorship::Table, Mentorship::MenteeId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Week::Table)
                    .if_not_exists()
                    .col(pk_auto(Week::Id))
                    .col(integer(Week::SemesterId))
                    .col(integer(Week::WeekNum))
                    .col(string_len(Week::Header, 200))
                    .col(text(Week::Intro))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-week-semester_id")
                            .from(Week::Table, Week::SemesterId)
                            .to(Semester::Table, Semester::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_week_semester_id_week_num")
                    .table(Week::Table)
                    .col(Week::SemesterId)
                    .col(Week::WeekNum)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Assignment::Table)
                    .if_not_exists()
                    .col(pk_auto(Assignment::Id))
                    .col(integer(Assignment::WeekId))
                    .col(string_len(Assignment::Name, 200))
                    .col(text(Assignment::Instructions))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-assignment-week_id")
                            .from(Assignment::Table, Assignment::WeekId)
                            .to(Week::Table, Week::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Document::Table)
                    .if_not_exists()
                    .col(pk_auto(Document::Id))
                    .col(integer(Document::WeekId))
                    .col(string_len(Document::Name, 255))
                    .col(blob(Document::Data))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-document-week_id")
                            .from(Document::Table, Document::WeekId)
                            .to(Week::Table, Week::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Submission::Table)
                    .if_not_exists()
                    .col(pk_auto(Submission::Id))
                    .col(integer(Submission::AssignmentId))
                    .col(integer(Submission::AuthorId))
                    .col(timestamp(Submission::Timestamp).default(Expr::current_timestamp()))
                    .col(text(Submission::Text))
                    .col(string_len_null(Submission::Filename, 255))
                    .col(blob_null(Submission::Attachment))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-assignment_id")
                            .from(Submission::Table, Submission::AssignmentId)
                            .to(Assignment::Table, Assignment::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-submission-author_id")
                            .from(Submission::Table, Submission::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_assignment_id")
                    .table(Submission::Table)
                    .col(Submission::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submission_author_id")
                    .table(Submission::Table)
                    .col(Submission::AuthorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Feedback::Table)
                    .if_not_exists()
                    .col(pk_auto(Feedback::Id))
                    .col(integer(Feedback::SubmissionId))
                    .col(integer(Feedback::AuthorId))
                    .col(text(Feedback::Text))
                    .col(timestamp(Feedback::Timestamp).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-feedback-submission_id")
                            .from(Feedback::Table, Feedback::SubmissionId)
                            .to(Submission::Table, Submission::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-feedback-author_id")
                            .from(Feedback::Table, Feedback::AuthorId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Announcement::Table)
                    .if_not_exists()
                    .col(pk_auto(Announcement::Id))
                    .col(string_len(Announcement::Author, 255))
                    .col(string_len(Announcement::Title, 200))
                    .col(text(Announcement::Content))
                    .col(timestamp(Announcement::Timestamp).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_announcement_timestamp")
                    .table(Announcement::Table)
                    .col(Announcement::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Session::Table)
                    .if_not_exists()
                    .col(string_len(Session::Token, 36).primary_key())
                    .col(integer(Session::UserId))
                    .col(timestamp(Session::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-session-user_id")
                            .from(Session::Table, Session::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Session::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Announcement::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Feedback::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Submission::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Document::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Assignment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Week::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Mentorship::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Enrollment::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Semester::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(User::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum User {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    Admin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Semester {
    Table,
    Id,
    Name,
    SortOrder,
}

#[derive(DeriveIden)]
enum Enrollment {
    Table,
    UserId,
    SemesterId,
}

#[derive(DeriveIden)]
enum Mentorship {
    Table,
    MentorId,
    MenteeId,
}

#[derive(DeriveIden)]
enum Week {
    Table,
    Id,
    SemesterId,
    WeekNum,
    Header,
    Intro,
}

#[derive(DeriveIden)]
enum Assignment {
    Table,
    Id,
    WeekId,
    Name,
    Instructions,
}

#[derive(DeriveIden)]
enum Document {
    Table,
    Id,
    WeekId,
    Name,
    Data,
}

#[derive(DeriveIden)]
enum Submission {
    Table,
    Id,
    AssignmentId,
    AuthorId,
    Timestamp,
    Text,
    Filename,
    Attachment,
}

#[derive(DeriveIden)]
enum Feedback {
    Table,
    Id,
    SubmissionId,
    AuthorId,
    Text,
    Timestamp,
}

#[derive(DeriveIden)]
enum Announcement {
    Table,
    Id,
    Author,
    Title,
    Content,
    Timestamp,
}

#[derive(DeriveIden)]
enum Session {
    Table,
    Token,
    UserId,
    CreatedAt,
}
