//! Login and registration pages.

use axum_helpers::HtmlTemplates;
use handlebars::TemplateError;
use serde::Serialize;

pub const LOGIN_TEMPLATE: &str = "login";
pub const REGISTER_TEMPLATE: &str = "register";

const LOGIN_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Log in</title></head>
<body>
  <h1>Log in</h1>
  {{#if error}}<p class="error">{{error}}</p>{{/if}}
  <form method="post" action="/login/">
    <input type="hidden" name="next" value="{{next}}">
    <p><label for="username">Username</label>
      <input id="username" name="username" value="{{username}}" autofocus required></p>
    <p><label for="password">Password</label>
      <input id="password" name="password" type="password" required></p>
    <p><label><input name="remember_me" type="checkbox"> Remember me</label></p>
    <button type="submit">Log in</button>
  </form>
  <p>No account? <a href="/register/">Register</a></p>
</body>
</html>
"#;

const REGISTER_HTML: &str = r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><title>Register</title></head>
<body>
  <h1>Register</h1>
  {{#if errors}}
  <ul class="errors">
    {{#each errors}}<li>{{this}}</li>{{/each}}
  </ul>
  {{/if}}
  <form method="post" action="/register/">
    <p><label for="username">Username</label>
      <input id="username" name="username" value="{{username}}" autofocus required></p>
    <p><label for="password">Password</label>
      <input id="password" name="password" type="password" required></p>
    <p><label for="password2">Password confirmation</label>
      <input id="password2" name="password2" type="password" required></p>
    <button type="submit">Register</button>
  </form>
  <p>Already registered? <a href="/login/">Log in</a></p>
</body>
</html>
"#;

#[derive(Debug, Serialize)]
pub struct LoginPage<'a> {
    pub error: Option<&'a str>,
    pub next: &'a str,
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterPage<'a> {
    pub errors: Vec<String>,
    pub username: &'a str,
}

pub fn auth_templates() -> Result<HtmlTemplates, TemplateError> {
    HtmlTemplates::new([
        (LOGIN_TEMPLATE, LOGIN_HTML),
        (REGISTER_TEMPLATE, REGISTER_HTML),
    ])
}
