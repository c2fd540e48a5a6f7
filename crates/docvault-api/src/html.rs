//! Server-rendered HTML for the browser pages.
//!
//! Every piece of user-controlled text goes through [`escape`] before it
//! is interpolated.

use std::fmt::Write;

use docvault_entity::document::Document;
use docvault_entity::folder::Folder;

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title} - DocVault</title>\n\
         </head>\n\
         <body>\n\
         <header><a href=\"/\">DocVault</a></header>\n\
         <main>\n{body}</main>\n\
         </body>\n\
         </html>\n",
        title = escape(title),
    )
}

/// Folder index with a create form.
pub fn folder_index(folders: &[Folder]) -> String {
    let mut body = String::from("<h1>Folders</h1>\n");

    body.push_str(
        "<form method=\"post\" action=\"/folders\">\n\
         <input type=\"text\" name=\"name\" placeholder=\"Folder name\" required>\n\
         <button type=\"submit\">Create folder</button>\n\
         </form>\n",
    );

    if folders.is_empty() {
        body.push_str("<p>No folders yet.</p>\n");
    } else {
        body.push_str("<ul class=\"folders\">\n");
        for folder in folders {
            let _ = writeln!(
                body,
                "<li><a href=\"/folders/{id}\">{name}</a> \
                 <small>created {created}</small> \
                 <form method=\"post\" action=\"/folders/{id}/delete\" style=\"display:inline\">\
                 <button type=\"submit\">Delete</button></form></li>",
                id = folder.id,
                name = escape(&folder.name),
                created = folder.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
        body.push_str("</ul>\n");
    }

    layout("Folders", &body)
}

/// Folder detail page with the document list and an upload form.
pub fn folder_detail(folder: &Folder, documents: &[Document]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>", escape(&folder.name));

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/folders/{id}/upload\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"file\" required>\n\
         <button type=\"submit\">Upload</button>\n\
         </form>",
        id = folder.id,
    );

    if documents.is_empty() {
        body.push_str("<p>This folder is empty.</p>\n");
    } else {
        body.push_str(
            "<table class=\"documents\">\n\
             <tr><th>Title</th><th>Type</th><th>Size</th><th>Uploaded</th><th></th></tr>\n",
        );
        for document in documents {
            let _ = writeln!(
                body,
                "<tr><td><a href=\"/api/documents/{id}/view\" target=\"_blank\">{title}</a></td>\
                 <td>{content_type}</td><td>{size}</td><td>{created}</td>\
                 <td><form method=\"post\" action=\"/documents/{id}/delete\">\
                 <button type=\"submit\">Delete</button></form></td></tr>",
                id = document.id,
                title = escape(&document.title),
                content_type = escape(&document.content_type),
                size = human_size(document.size_bytes),
                created = document.created_at.format("%Y-%m-%d %H:%M"),
            );
        }
        body.push_str("</table>\n");
    }

    let _ = writeln!(
        body,
        "<form method=\"post\" action=\"/folders/{id}/delete\">\
         <button type=\"submit\">Delete folder</button></form>",
        id = folder.id,
    );

    layout(&folder.name, &body)
}

/// Error page shown when a form action fails.
pub fn error_page(status: u16, code: &str, message: &str) -> String {
    let body = format!(
        "<h1>{status} {code}</h1>\n<p>{message}</p>\n<p><a href=\"/\">Back to folders</a></p>\n",
        code = escape(code),
        message = escape(message),
    );
    layout("Error", &body)
}

fn human_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
