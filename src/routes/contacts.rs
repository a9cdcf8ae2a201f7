use askama::Template;

use crate::routes::home::Html;

#[derive(Template)]
#[template(path = "pages/contacts.html")]
pub struct ContactsTemplate;

pub async fn contacts() -> Html<ContactsTemplate> {
    Html(ContactsTemplate)
}
