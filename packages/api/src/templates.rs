//! Server-side HTML templates.
//!
//! Pages are MiniJinja templates compiled into the binary. All of them extend
//! `base.html` and build links with the `url(name, slug)` function, which
//! resolves through [`routes::reverse`]. Templates ending in `.html` are
//! auto-escaped.

use axum::response::Html;
use minijinja::{Environment, Error, ErrorKind, Value};
use serde::Serialize;

use crate::error::AppError;
use crate::routes;

const BASE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{% block title %}Notes{% endblock %}</title>
</head>
<body>
    <header>
        <nav>
            <a href="{{ url('notes:home') }}">Home</a>
            {% if user %}
            <a href="{{ url('notes:list') }}">My notes</a>
            <a href="{{ url('notes:add') }}">Add a note</a>
            <form method="post" action="{{ url('users:logout') }}">
                <button type="submit">Log out ({{ user.username }})</button>
            </form>
            {% else %}
            <a href="{{ url('users:login') }}">Log in</a>
            <a href="{{ url('users:signup') }}">Sign up</a>
            {% endif %}
        </nav>
    </header>
    <main>
        {% block content %}{% endblock %}
    </main>
</body>
</html>"##;

const HOME: &str = r##"{% extends "base.html" %}
{% block content %}
<h1>Notes</h1>
<p>Keep short personal notes, each reachable under its own slug.</p>
{% if not user %}<p><a href="{{ url('users:login') }}">Log in</a> to start writing.</p>{% endif %}
{% endblock %}"##;

const NOTE_LIST: &str = r##"{% extends "base.html" %}
{% block title %}My notes{% endblock %}
{% block content %}
<h1>My notes</h1>
<ul class="notes">
{% for note in object_list %}
    <li class="note"><a href="{{ url('notes:detail', note.slug) }}">{{ note.title }}</a></li>
{% else %}
    <li class="empty">No notes yet.</li>
{% endfor %}
</ul>
{% endblock %}"##;

const NOTE_DETAIL: &str = r##"{% extends "base.html" %}
{% block title %}{{ note.title }}{% endblock %}
{% block content %}
<article>
    <h1>{{ note.title }}</h1>
    <p class="text">{{ note.text }}</p>
</article>
<a href="{{ url('notes:edit', note.slug) }}">Edit</a>
<a href="{{ url('notes:delete', note.slug) }}">Delete</a>
{% endblock %}"##;

const NOTE_FORM: &str = r##"{% extends "base.html" %}
{% block title %}{% if note %}Edit note{% else %}Add a note{% endif %}{% endblock %}
{% block content %}
<h1>{% if note %}Edit note{% else %}Add a note{% endif %}</h1>
<form method="post" action="{{ action }}">
    <label>Title <input type="text" name="title" maxlength="100" value="{{ form.title }}"></label>
    {% for error in errors["title"] | default([]) %}<p class="error" data-field="title">{{ error }}</p>{% endfor %}
    <label>Text <textarea name="text">{{ form.text }}</textarea></label>
    {% for error in errors["text"] | default([]) %}<p class="error" data-field="text">{{ error }}</p>{% endfor %}
    <label>Slug <input type="text" name="slug" maxlength="100" value="{{ form.slug }}"></label>
    <small>Leave empty to derive it from the title.</small>
    {% for error in errors["slug"] | default([]) %}<p class="error" data-field="slug">{{ error }}</p>{% endfor %}
    <button type="submit">Save</button>
</form>
{% endblock %}"##;

const NOTE_DELETE: &str = r##"{% extends "base.html" %}
{% block title %}Delete note{% endblock %}
{% block content %}
<h1>Delete "{{ note.title }}"?</h1>
<form method="post" action="{{ url('notes:delete', note.slug) }}">
    <button type="submit">Delete</button>
</form>
{% endblock %}"##;

const NOTE_SUCCESS: &str = r##"{% extends "base.html" %}
{% block title %}Done{% endblock %}
{% block content %}
<h1>Done</h1>
<p>Your changes were saved.</p>
<a href="{{ url('notes:list') }}">Back to my notes</a>
{% endblock %}"##;

const LOGIN: &str = r##"{% extends "base.html" %}
{% block title %}Log in{% endblock %}
{% block content %}
<h1>Log in</h1>
{% for error in errors["form"] | default([]) %}<p class="error">{{ error }}</p>{% endfor %}
<form method="post" action="{{ url('users:login') }}">
    <input type="hidden" name="next" value="{{ next }}">
    <label>Username <input type="text" name="username" value="{{ form.username }}"></label>
    <label>Password <input type="password" name="password"></label>
    <button type="submit">Log in</button>
</form>
{% endblock %}"##;

const LOGGED_OUT: &str = r##"{% extends "base.html" %}
{% block title %}Logged out{% endblock %}
{% block content %}
<h1>You have been logged out</h1>
<a href="{{ url('users:login') }}">Log in again</a>
{% endblock %}"##;

const SIGNUP: &str = r##"{% extends "base.html" %}
{% block title %}Sign up{% endblock %}
{% block content %}
<h1>Sign up</h1>
<form method="post" action="{{ url('users:signup') }}">
    <label>Username <input type="text" name="username" maxlength="150" value="{{ form.username }}"></label>
    {% for error in errors["username"] | default([]) %}<p class="error">{{ error }}</p>{% endfor %}
    <label>Password <input type="password" name="password1"></label>
    {% for error in errors["password1"] | default([]) %}<p class="error">{{ error }}</p>{% endfor %}
    <label>Password confirmation <input type="password" name="password2"></label>
    {% for error in errors["password2"] | default([]) %}<p class="error">{{ error }}</p>{% endfor %}
    <button type="submit">Sign up</button>
</form>
{% endblock %}"##;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", BASE),
    ("home.html", HOME),
    ("notes/list.html", NOTE_LIST),
    ("notes/detail.html", NOTE_DETAIL),
    ("notes/form.html", NOTE_FORM),
    ("notes/delete.html", NOTE_DELETE),
    ("notes/success.html", NOTE_SUCCESS),
    ("users/login.html", LOGIN),
    ("users/logged_out.html", LOGGED_OUT),
    ("users/signup.html", SIGNUP),
];

/// The compiled page templates.
#[derive(Debug)]
pub struct Templates {
    env: Environment<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, Error> {
        let mut env = Environment::new();
        env.add_function("url", url);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    pub fn render<S: Serialize>(&self, name: &str, ctx: S) -> Result<Html<String>, AppError> {
        Ok(Html(self.env.get_template(name)?.render(ctx)?))
    }
}

/// Paths are built from validated slugs, so they go out unescaped.
fn url(name: &str, slug: Option<&str>) -> Result<Value, Error> {
    routes::reverse(name, slug).map(Value::from_safe_string).ok_or_else(|| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("no route named `{name}` taking {slug:?}"),
        )
    })
}
