//! Stateless HTML renderer.
//!
//! Turns a [`TaskView`] into the task page and renders the login page. The
//! pages are plain forms posting to the routes in [`crate::web`], so they work
//! without any client-side script.

use super::engine::TaskView;
use super::messages::Message;
use super::task::Filter;
use std::fmt::Write;

const STYLE: &str = "body{font-family:sans-serif;max-width:36rem;margin:2rem auto;padding:0 1rem}\
h1{text-align:center}\
form.inline{display:inline}\
.tabs button{margin-right:.5rem}.tabs button.current{font-weight:bold}\
ul.tasks{list-style:none;padding:0}ul.tasks li{display:flex;gap:.5rem;align-items:center;margin:.4rem 0}\
.done{text-decoration:line-through;color:#777}\
.notice{color:#b00}.ok{color:#070}\
footer{display:flex;justify-content:space-between;align-items:center}";

/// Severity of the one-line message shown above a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Failure,
}

pub fn tasks_page(view: &TaskView, username: &str, notice: Option<&str>) -> String {
    let mut body = String::new();

    let _ = write!(
        body,
        "<p>{} <form class=\"inline\" method=\"post\" action=\"/logout\"><button>Logout</button></form></p>",
        escape(username)
    );
    if let Some(notice) = notice {
        let _ = write!(body, "<p class=\"notice\" role=\"status\">{}</p>", escape(notice));
    }

    body.push_str(
        "<form method=\"post\" action=\"/tasks\">\
         <input name=\"name\" placeholder=\"What needs to be done?\" autofocus required>\
         <button>Add</button></form>",
    );

    body.push_str("<form class=\"tabs\" method=\"post\" action=\"/filter\">");
    for filter in Filter::ALL {
        let class = if filter == view.filter { " class=\"current\"" } else { "" };
        let _ = write!(body, "<button name=\"filter\" value=\"{0}\"{1}>{0}</button>", filter, class);
    }
    body.push_str("</form>");

    body.push_str("<ul class=\"tasks\">");
    for row in view.visible() {
        let id = row.id;
        let (label, class) = if row.completed { ("Undo", " class=\"done\"") } else { ("Done", "") };
        let _ = write!(
            body,
            "<li>\
             <form class=\"inline\" method=\"post\" action=\"/tasks/{id}/toggle\"><button title=\"Toggle\">{label}</button></form>\
             <span{class}>{name}</span>\
             <form class=\"inline\" method=\"post\" action=\"/tasks/{id}/rename\">\
             <input name=\"name\" value=\"{name}\" aria-label=\"Rename\" required><button title=\"Update To-Do\">Save</button></form>\
             <form class=\"inline\" method=\"post\" action=\"/tasks/{id}/delete\"><button title=\"Delete To-Do\">Delete</button></form>\
             </li>",
            id = id,
            label = label,
            class = class,
            name = escape(&row.name),
        );
    }
    body.push_str("</ul>");

    let _ = write!(
        body,
        "<footer><span>{}</span>\
         <form method=\"post\" action=\"/tasks/clear-completed\"><button>Clear completed</button></form></footer>",
        Message::ActiveItemsLeft(view.active_count)
    );

    layout("Todos", &body)
}

pub fn login_page(message: Option<(NoticeKind, &str)>) -> String {
    let mut body = String::new();

    if let Some((kind, text)) = message {
        let class = match kind {
            NoticeKind::Success => "ok",
            NoticeKind::Failure => "notice",
        };
        let _ = write!(body, "<p class=\"{}\" role=\"status\">{}</p>", class, escape(text));
    }

    body.push_str(
        "<form method=\"post\" action=\"/login\">\
         <p><input name=\"username\" placeholder=\"Username\" autocomplete=\"username\" required></p>\
         <p><input name=\"password\" type=\"password\" placeholder=\"Password\" autocomplete=\"current-password\" required></p>\
         <button>Login</button> <button formaction=\"/register\">Register</button>\
         </form>",
    );

    layout("ToDo App", &body)
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{0}</title><style>{1}</style></head>\
         <body><h1>{0}</h1>{2}</body></html>",
        escape(title),
        STYLE,
        body
    )
}

pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
