//! 整库导出与导入（zip）。
//!
//! ```text
//! manifest.json              格式标记、版本、各表行数
//! tables/<table>.json        每表一个 JSON 数组
//! blobs/documents/<id>       文档内容
//! blobs/submissions/<id>     提交附件
//! ```

use std::collections::{BTreeMap, HashSet};
use std::io::{Cursor, Read, Write};

use anyhow::Context;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryOrder,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::entity::{
    announcement, assignment, document, enrollment, feedback, mentorship, semester, session,
    submission, user, week,
};

pub const FORMAT: &str = "collegejump-export-v1";
pub const VERSION: u32 = 1;

const MANIFEST_ENTRY: &str = "manifest.json";
const INSERT_CHUNK: usize = 100;

const USERS: &str = "users";
const SEMESTERS: &str = "semesters";
const ENROLLMENTS: &str = "enrollments";
const MENTORSHIPS: &str = "mentorships";
const WEEKS: &str = "weeks";
const ASSIGNMENTS: &str = "assignments";
const DOCUMENTS: &str = "documents";
const SUBMISSIONS: &str = "submissions";
const FEEDBACK: &str = "feedback";
const ANNOUNCEMENTS: &str = "announcements";

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("malformed archive: {0}")]
    Malformed(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

fn malformed(message: impl Into<String>) -> ArchiveError {
    ArchiveError::Malformed(message.into())
}

#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    format: String,
    version: u32,
    app_version: String,
    exported_at: NaiveDateTime,
    tables: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<user::Model>,
    pub semesters: Vec<semester::Model>,
    pub enrollments: Vec<enrollment::Model>,
    pub mentorships: Vec<mentorship::Model>,
    pub weeks: Vec<week::Model>,
    pub assignments: Vec<assignment::Model>,
    pub documents: Vec<document::Model>,
    pub submissions: Vec<submission::Model>,
    pub feedback: Vec<feedback::Model>,
    pub announcements: Vec<announcement::Model>,
}

pub async fn table_counts<C: ConnectionTrait>(conn: &C) -> anyhow::Result<BTreeMap<String, u64>> {
    Ok(BTreeMap::from([
        (USERS.to_string(), user::Entity::find().count(conn).await?),
        (SEMESTERS.to_string(), semester::Entity::find().count(conn).await?),
        (ENROLLMENTS.to_string(), enrollment::Entity::find().count(conn).await?),
        (MENTORSHIPS.to_string(), mentorship::Entity::find().count(conn).await?),
        (WEEKS.to_string(), week::Entity::find().count(conn).await?),
        (ASSIGNMENTS.to_string(), assignment::Entity::find().count(conn).await?),
        (DOCUMENTS.to_string(), document::Entity::find().count(conn).await?),
        (SUBMISSIONS.to_string(), submission::Entity::find().count(conn).await?),
        (FEEDBACK.to_string(), feedback::Entity::find().count(conn).await?),
        (ANNOUNCEMENTS.to_string(), announcement::Entity::find().count(conn).await?),
    ]))
}

impl Snapshot {
    pub async fn load<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Self> {
        Ok(Self {
            users: user::Entity::find()
                .order_by_asc(user::Column::Id)
                .all(conn)
                .await?,
            semesters: semester::Entity::find()
                .order_by_asc(semester::Column::Id)
                .all(conn)
                .await?,
            enrollments: enrollment::Entity::find()
                .order_by_asc(enrollment::Column::UserId)
                .order_by_asc(enrollment::Column::SemesterId)
                .all(conn)
                .await?,
            mentorships: mentorship::Entity::find()
                .order_by_asc(mentorship::Column::MentorId)
                .order_by_asc(mentorship::Column::MenteeId)
                .all(conn)
                .await?,
            weeks: week::Entity::find()
                .order_by_asc(week::Column::Id)
                .all(conn)
                .await?,
            assignments: assignment::Entity::find()
                .order_by_asc(assignment::Column::Id)
                .all(conn)
                .await?,
            documents: document::Entity::find()
                .order_by_asc(document::Column::Id)
                .all(conn)
                .await?,
            submissions: submission::Entity::find()
                .order_by_asc(submission::Column::Id)
                .all(conn)
                .await?,
            feedback: feedback::Entity::find()
                .order_by_asc(feedback::Column::Id)
                .all(conn)
                .await?,
            announcements: announcement::Entity::find()
                .order_by_asc(announcement::Column::Id)
                .all(conn)
                .await?,
        })
    }

    pub fn counts(&self) -> BTreeMap<String, u64> {
        [
            (USERS, self.users.len()),
            (SEMESTERS, self.semesters.len()),
            (ENROLLMENTS, self.enrollments.len()),
            (MENTORSHIPS, self.mentorships.len()),
            (WEEKS, self.weeks.len()),
            (ASSIGNMENTS, self.assignments.len()),
            (DOCUMENTS, self.documents.len()),
            (SUBMISSIONS, self.submissions.len()),
            (FEEDBACK, self.feedback.len()),
            (ANNOUNCEMENTS, self.announcements.len()),
        ]
        .into_iter()
        .map(|(table, rows)| (table.to_string(), rows as u64))
        .collect()
    }

    pub fn to_zip(&self) -> anyhow::Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

        let manifest = Manifest {
            format: FORMAT.to_string(),
            version: VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now().naive_utc(),
            tables: self.counts(),
        };
        zip.start_file(MANIFEST_ENTRY, opts)
            .context("failed to start manifest entry")?;
        zip.write_all(&serde_json::to_vec_pretty(&manifest)?)
            .context("failed to write manifest entry")?;

        write_table(&mut zip, opts, USERS, &self.users)?;
        write_table(&mut zip, opts, SEMESTERS, &self.semesters)?;
        write_table(&mut zip, opts, ENROLLMENTS, &self.enrollments)?;
        write_table(&mut zip, opts, MENTORSHIPS, &self.mentorships)?;
        write_table(&mut zip, opts, WEEKS, &self.weeks)?;
        write_table(&mut zip, opts, ASSIGNMENTS, &self.assignments)?;
        write_table(&mut zip, opts, DOCUMENTS, &self.documents)?;
        write_table(&mut zip, opts, SUBMISSIONS, &self.submissions)?;
        write_table(&mut zip, opts, FEEDBACK, &self.feedback)?;
        write_table(&mut zip, opts, ANNOUNCEMENTS, &self.announcements)?;

        for document in &self.documents {
            write_blob(&mut zip, opts, &document_blob(document.id), &document.data)?;
        }
        for submission in &self.submissions {
            if let Some(data) = &submission.attachment {
                write_blob(&mut zip, opts, &submission_blob(submission.id), data)?;
            }
        }

        let cursor = zip.finish().context("failed to finalize archive")?;
        Ok(cursor.into_inner())
    }

    /// 解码并校验归档，不访问数据库。
    pub fn from_zip(bytes: &[u8]) -> Result<Self, ArchiveError> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|err| malformed(format!("not a zip archive: {err}")))?;

        let manifest: Manifest = serde_json::from_slice(&read_entry(&mut archive, MANIFEST_ENTRY)?)
            .map_err(|err| malformed(format!("invalid manifest: {err}")))?;
        if manifest.format != FORMAT {
            return Err(malformed(format!(
                "unsupported archive format `{}`",
                manifest.format
            )));
        }
        if manifest.version > VERSION {
            return Err(malformed(format!(
                "archive version {} is newer than supported version {VERSION}",
                manifest.version
            )));
        }

        let mut snapshot = Self {
            users: read_table(&mut archive, &manifest, USERS)?,
            semesters: read_table(&mut archive, &manifest, SEMESTERS)?,
            enrollments: read_table(&mut archive, &manifest, ENROLLMENTS)?,
            mentorships: read_table(&mut archive, &manifest, MENTORSHIPS)?,
            weeks: read_table(&mut archive, &manifest, WEEKS)?,
            assignments: read_table(&mut archive, &manifest, ASSIGNMENTS)?,
            documents: read_table(&mut archive, &manifest, DOCUMENTS)?,
            submissions: read_table(&mut archive, &manifest, SUBMISSIONS)?,
            feedback: read_table(&mut archive, &manifest, FEEDBACK)?,
            announcements: read_table(&mut archive, &manifest, ANNOUNCEMENTS)?,
        };

        for document in &mut snapshot.documents {
            document.data = read_entry(&mut archive, &document_blob(document.id))?;
        }
        for submission in &mut snapshot.submissions {
            if submission.filename.is_some() {
                submission.attachment =
                    Some(read_entry(&mut archive, &submission_blob(submission.id))?);
            }
        }

        snapshot.check_references()?;
        Ok(snapshot)
    }

    fn check_references(&self) -> Result<(), ArchiveError> {
        let users = unique_ids(USERS, self.users.iter().map(|row| row.id))?;
        let semesters = unique_ids(SEMESTERS, self.semesters.iter().map(|row| row.id))?;
        let weeks = unique_ids(WEEKS, self.weeks.iter().map(|row| row.id))?;
        let assignments = unique_ids(ASSIGNMENTS, self.assignments.iter().map(|row| row.id))?;
        unique_ids(DOCUMENTS, self.documents.iter().map(|row| row.id))?;
        let submissions = unique_ids(SUBMISSIONS, self.submissions.iter().map(|row| row.id))?;
        unique_ids(FEEDBACK, self.feedback.iter().map(|row| row.id))?;
        unique_ids(ANNOUNCEMENTS, self.announcements.iter().map(|row| row.id))?;

        let mut emails = HashSet::new();
        for row in &self.users {
            if !emails.insert(row.email.as_str()) {
                return Err(malformed(format!("duplicate user email `{}`", row.email)));
            }
        }

        for row in &self.enrollments {
            require(ENROLLMENTS, "user_id", row.user_id, &users)?;
            require(ENROLLMENTS, "semester_id", row.semester_id, &semesters)?;
        }
        for row in &self.mentorships {
            require(MENTORSHIPS, "mentor_id", row.mentor_id, &users)?;
            require(MENTORSHIPS, "mentee_id", row.mentee_id, &users)?;
        }

        let mut week_slots = HashSet::new();
        for row in &self.weeks {
            require(WEEKS, "semester_id", row.semester_id, &semesters)?;
            if !week_slots.insert((row.semester_id, row.week_num)) {
                return Err(malformed(format!(
                    "semester {} has two weeks numbered {}",
                    row.semester_id, row.week_num
                )));
            }
        }
        for row in &self.assignments {
            require(ASSIGNMENTS, "week_id", row.week_id, &weeks)?;
        }
        for row in &self.documents {
            require(DOCUMENTS, "week_id", row.week_id, &weeks)?;
        }
        for row in &self.submissions {
            require(SUBMISSIONS, "assignment_id", row.assignment_id, &assignments)?;
            require(SUBMISSIONS, "author_id", row.author_id, &users)?;
        }
        for row in &self.feedback {
            require(FEEDBACK, "submission_id", row.submission_id, &submissions)?;
            require(FEEDBACK, "author_id", row.author_id, &users)?;
        }

        Ok(())
    }

    /// 用快照替换所有表，须在事务内调用。导入后仍存在的用户保留会话。
    pub async fn restore<C: ConnectionTrait>(self, conn: &C) -> anyhow::Result<()> {
        let user_ids: HashSet<i32> = self.users.iter().map(|row| row.id).collect();
        let sessions: Vec<session::Model> = session::Entity::find()
            .all(conn)
            .await?
            .into_iter()
            .filter(|row| user_ids.contains(&row.user_id))
            .collect();

        session::Entity::delete_many().exec(conn).await?;
        feedback::Entity::delete_many().exec(conn).await?;
        submission::Entity::delete_many().exec(conn).await?;
        document::Entity::delete_many().exec(conn).await?;
        assignment::Entity::delete_many().exec(conn).await?;
        week::Entity::delete_many().exec(conn).await?;
        enrollment::Entity::delete_many().exec(conn).await?;
        mentorship::Entity::delete_many().exec(conn).await?;
        semester::Entity::delete_many().exec(conn).await?;
        announcement::Entity::delete_many().exec(conn).await?;
        user::Entity::delete_many().exec(conn).await?;

        insert_all::<_, user::ActiveModel>(conn, self.users).await?;
        insert_all::<_, semester::ActiveModel>(conn, self.semesters).await?;
        insert_all::<_, enrollment::ActiveModel>(conn, self.enrollments).await?;
        insert_all::<_, mentorship::ActiveModel>(conn, self.mentorships).await?;
        insert_all::<_, week::ActiveModel>(conn, self.weeks).await?;
        insert_all::<_, assignment::ActiveModel>(conn, self.assignments).await?;
        insert_all::<_, document::ActiveModel>(conn, self.documents).await?;
        insert_all::<_, submission::ActiveModel>(conn, self.submissions).await?;
        insert_all::<_, feedback::ActiveModel>(conn, self.feedback).await?;
        insert_all::<_, announcement::ActiveModel>(conn, self.announcements).await?;
        insert_all::<_, session::ActiveModel>(conn, sessions).await?;

        Ok(())
    }
}

fn document_blob(id: i32) -> String {
    format!("blobs/documents/{id}")
}

fn submission_blob(id: i32) -> String {
    format!("blobs/submissions/{id}")
}

fn write_table<T: Serialize>(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    opts: FileOptions,
    table: &str,
    rows: &[T],
) -> anyhow::Result<()> {
    zip.start_file(format!("tables/{table}.json"), opts)
        .with_context(|| format!("failed to start entry for table {table}"))?;
    zip.write_all(&serde_json::to_vec_pretty(rows)?)
        .with_context(|| format!("failed to write table {table}"))?;
    Ok(())
}

fn write_blob(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    opts: FileOptions,
    name: &str,
    data: &[u8],
) -> anyhow::Result<()> {
    zip.start_file(name, opts)
        .with_context(|| format!("failed to start entry {name}"))?;
    zip.write_all(data)
        .with_context(|| format!("failed to write entry {name}"))?;
    Ok(())
}

fn read_entry(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    name: &str,
) -> Result<Vec<u8>, ArchiveError> {
    let mut entry = archive
        .by_name(name)
        .map_err(|_| malformed(format!("missing entry {name}")))?;

    let mut data = Vec::new();
    entry
        .read_to_end(&mut data)
        .map_err(|err| malformed(format!("failed to read entry {name}: {err}")))?;
    Ok(data)
}

fn read_table<T: DeserializeOwned>(
    archive: &mut ZipArchive<Cursor<&[u8]>>,
    manifest: &Manifest,
    table: &str,
) -> Result<Vec<T>, ArchiveError> {
    let name = format!("tables/{table}.json");
    let rows: Vec<T> = serde_json::from_slice(&read_entry(archive, &name)?)
        .map_err(|err| malformed(format!("invalid {name}: {err}")))?;

    let expected = manifest
        .tables
        .get(table)
        .copied()
        .ok_or_else(|| malformed(format!("manifest has no count for table {table}")))?;
    if rows.len() as u64 != expected {
        return Err(malformed(format!(
            "table {table} has {} rows, manifest says {expected}",
            rows.len()
        )));
    }

    Ok(rows)
}

fn unique_ids(
    table: &str,
    ids: impl Iterator<Item = i32>,
) -> Result<HashSet<i32>, ArchiveError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(malformed(format!("duplicate id {id} in table {table}")));
        }
    }
    Ok(seen)
}

fn require(table: &str, column: &str, id: i32, known: &HashSet<i32>) -> Result<(), ArchiveError> {
    if known.contains(&id) {
        Ok(())
    } else {
        Err(malformed(format!(
            "{table}.{column} refers to missing row {id}"
        )))
    }
}

async fn insert_all<C, A>(
    conn: &C,
    rows: Vec<<A::Entity as EntityTrait>::Model>,
) -> anyhow::Result<()>
where
    C: ConnectionTrait,
    A: ActiveModelTrait + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let chunk: Vec<A> = rows
            .by_ref()
            .take(INSERT_CHUNK)
            .map(|row| row.into_active_model().reset_all())
            .collect();

        A::Entity::insert_many(chunk)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u32) -> NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2026, 9, 1)
            .and_then(|date| date.and_hms_opt(hour, 0, 0))
            .expect("valid timestamp")
    }

    fn sample() -> Snapshot {
        Snapshot {
            users: vec![
                user::Model {
                    id: 1,
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    password_hash: "$argon2id$stub".into(),
                    admin: true,
                    created_at: at(8),
                },
                user::Model {
                    id: 2,
                    name: "Ben".into(),
                    email: "ben@example.com".into(),
                    password_hash: "$argon2id$stub".into(),
                    admin: false,
                    created_at: at(9),
                },
            ],
            semesters: vec![semester::Model {
                id: 1,
                name: "Fall".into(),
                sort_order: 1,
            }],
            enrollments: vec![enrollment::Model {
                user_id: 2,
                semester_id: 1,
            }],
            mentorships: vec![mentorship::Model {
                mentor_id: 1,
                mentee_id: 2,
            }],
            weeks: vec![week::Model {
                id: 1,
                semester_id: 1,
                week_num: 1,
                header: "Essays".into(),
                intro: "Start drafting.".into(),
            }],
            assignments: vec![assignment::Model {
                id: 1,
                week_id: 1,
                name: "Draft".into(),
                instructions: "Write 500 words.".into(),
            }],
            documents: vec![document::Model {
                id: 1,
                week_id: 1,
                name: "rubric.pdf".into(),
                data: b"%PDF-1.4 rubric".to_vec(),
            }],
            submissions: vec![
                submission::Model {
                    id: 1,
                    assignment_id: 1,
                    author_id: 2,
                    timestamp: at(10),
                    text: "My draft".into(),
                    filename: Some("draft.txt".into()),
                    attachment: Some(b"draft body".to_vec()),
                },
                submission::Model {
                    id: 2,
                    assignment_id: 1,
                    author_id: 2,
                    timestamp: at(11),
                    text: "Revised".into(),
                    filename: None,
                    attachment: None,
                },
            ],
            feedback: vec![feedback::Model {
                id: 1,
                submission_id: 1,
                author_id: 1,
                text: "Good start".into(),
                timestamp: at(12),
            }],
            announcements: vec![announcement::Model {
                id: 1,
                author: "ada@example.com".into(),
                title: "Welcome".into(),
                content: "Hello".into(),
                timestamp: at(7),
            }],
        }
    }

    /// Builds an archive from raw entries, for feeding damaged input.
    fn zip_of(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            zip.start_file(*name, FileOptions::default())
                .expect("start entry");
            zip.write_all(data).expect("write entry");
        }
        zip.finish().expect("finish archive").into_inner()
    }

    fn entries_of(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid archive");
        (0..archive.len())
            .map(|index| {
                let mut entry = archive.by_index(index).expect("entry");
                let mut data = Vec::new();
                entry.read_to_end(&mut data).expect("read entry");
                (entry.name().to_string(), data)
            })
            .collect()
    }

    fn rebuild_without(bytes: &[u8], skip: &str) -> Vec<u8> {
        let entries = entries_of(bytes);
        let kept: Vec<(&str, Vec<u8>)> = entries
            .iter()
            .filter(|(name, _)| name != skip)
            .map(|(name, data)| (name.as_str(), data.clone()))
            .collect();
        zip_of(&kept)
    }

    #[test]
    fn archive_restores_rows_and_blobs() {
        let snapshot = sample();

        let bytes = snapshot.to_zip().expect("export");
        let decoded = Snapshot::from_zip(&bytes).expect("import");

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn archive_layout() {
        let bytes = sample().to_zip().expect("export");
        let names: Vec<String> = entries_of(&bytes).into_iter().map(|(name, _)| name).collect();

        assert!(names.contains(&"manifest.json".to_string()));
        assert!(names.contains(&"tables/users.json".to_string()));
        assert!(names.contains(&"blobs/documents/1".to_string()));
        assert!(names.contains(&"blobs/submissions/1".to_string()));
        assert!(!names.contains(&"blobs/submissions/2".to_string()));
    }

    #[test]
    fn table_json_has_no_blobs() {
        let bytes = sample().to_zip().expect("export");
        let entries = entries_of(&bytes);
        let (_, documents) = entries
            .iter()
            .find(|(name, _)| name == "tables/documents.json")
            .expect("documents table");

        let rows: serde_json::Value = serde_json::from_slice(documents).expect("json");
        assert!(rows[0].get("data").is_none());
        assert_eq!(rows[0]["name"], "rubric.pdf");
    }

    #[test]
    fn missing_blob_is_rejected() {
        let bytes = sample().to_zip().expect("export");
        let damaged = rebuild_without(&bytes, "blobs/documents/1");

        let err = Snapshot::from_zip(&damaged).expect_err("must reject");
        assert!(matches!(err, ArchiveError::Malformed(ref msg) if msg.contains("blobs/documents/1")));
    }

    #[test]
    fn missing_table_is_rejected() {
        let bytes = sample().to_zip().expect("export");
        let damaged = rebuild_without(&bytes, "tables/weeks.json");

        assert!(matches!(
            Snapshot::from_zip(&damaged),
            Err(ArchiveError::Malformed(_))
        ));
    }

    #[test]
    fn row_count_must_match_manifest() {
        let mut entries = entries_of(&sample().to_zip().expect("export"));
        for (name, data) in &mut entries {
            if name == "tables/announcements.json" {
                *data = b"[]".to_vec();
            }
        }
        let entries: Vec<(&str, Vec<u8>)> = entries
            .iter()
            .map(|(name, data)| (name.as_str(), data.clone()))
            .collect();

        let err = Snapshot::from_zip(&zip_of(&entries)).expect_err("must reject");
        assert!(matches!(err, ArchiveError::Malformed(ref msg) if msg.contains("announcements")));
    }

    #[test]
    fn foreign_format_is_rejected() {
        let manifest = serde_json::json!({
            "format": "something-else",
            "version": 1,
            "app_version": "0.0.0",
            "exported_at": "2026-09-01T00:00:00",
            "tables": {}
        });
        let bytes = zip_of(&[("manifest.json", manifest.to_string().into_bytes())]);

        assert!(matches!(
            Snapshot::from_zip(&bytes),
            Err(ArchiveError::Malformed(ref msg)) if msg.contains("something-else")
        ));
    }

    #[test]
    fn not_a_zip_is_rejected() {
        assert!(matches!(
            Snapshot::from_zip(b"definitely not a zip"),
            Err(ArchiveError::Malformed(_))
        ));
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut snapshot = sample();
        snapshot.feedback[0].submission_id = 99;

        let bytes = snapshot.to_zip().expect("export");
        let err = Snapshot::from_zip(&bytes).expect_err("must reject");
        assert!(matches!(err, ArchiveError::Malformed(ref msg) if msg.contains("feedback.submission_id")));
    }

    #[test]
    fn counts_cover_every_table() {
        let counts = sample().counts();

        assert_eq!(counts.len(), 10);
        assert_eq!(counts["users"], 2);
        assert_eq!(counts["submissions"], 2);
    }
}
