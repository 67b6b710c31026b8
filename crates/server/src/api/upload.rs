//! multipart 表单读取与文件下载响应。

use std::collections::HashMap;

use axum::{
    extract::Multipart,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use super::error::AppError;

/// 上传的文件。
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// 完整读入内存的 multipart 表单。
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let filename = field.file_name().map(basename);

            let data = field
                .bytes()
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;

            match filename {
                // 浏览器在未选择文件时仍会发送一个空的文件字段。
                Some(filename) if filename.is_empty() && data.is_empty() => {}
                Some(filename) => {
                    form.files.insert(
                        name,
                        UploadedFile {
                            filename,
                            data: data.to_vec(),
                        },
                    );
                }
                None => {
                    form.fields
                        .insert(name, String::from_utf8_lossy(&data).into_owned());
                }
            }
        }

        Ok(form)
    }

    /// 文本字段的值；缺失时为空字符串。
    pub fn text(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// 去掉客户端附带的目录部分。
fn basename(filename: &str) -> String {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// 以附件形式下载字节内容。
pub fn download(filename: &str, content_type: &'static str, data: Vec<u8>) -> Response {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c == ' ' || (c.is_ascii_graphic() && c != '"' && c != '\\') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let disposition = format!("attachment; filename=\"{safe}\"");

    (
        [(CONTENT_TYPE, content_type.to_string()), (CONTENT_DISPOSITION, disposition)],
        data,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_paths_are_stripped() {
        assert_eq!(basename("C:\\Users\\me\\essay.pdf"), "essay.pdf");
        assert_eq!(basename("/tmp/notes.txt"), "notes.txt");
        assert_eq!(basename("plain.md"), "plain.md");
    }

    #[test]
    fn download_sanitizes_filename() {
        let response = download("we\"ird\nname.txt", "application/octet-stream", b"x".to_vec());

        let disposition = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .expect("disposition header");
        assert_eq!(disposition, "attachment; filename=\"we_ird_name.txt\"");
    }
}
