//! Views: pure functions from a snapshot to a `DomNode` tree.
//!
//! Nothing here performs I/O. Rover buttons carry the rover's name in
//! `data-rover` and a `click → select_rover` event; the page's delegated
//! listener turns that into an action, so no state is serialized into markup.

use mars_dom::DomNode;
use mars_render_html::render_to_html;

use crate::state::{AppState, Photo, Rover};

pub const TITLE: &str = "Mars Dashboard";
pub const LEAD: &str = "Mars rover dashboard that consumes the NASA API";
pub const SEE_LATEST: &str = "See Latest Image";
pub const LOADING: &str = "Loading...";

/// Action names bound in rendered markup.
pub const SELECT_ROVER: &str = "select_rover";
pub const DISMISS_ERROR: &str = "dismiss_error";
pub const RELOAD: &str = "reload";

/// Attribute carrying a rover's identity on its action button.
pub const ROVER_ATTR: &str = "data-rover";

/// Render the whole dashboard body to markup.
pub fn render_markup(state: &AppState) -> String {
    render_to_html(&view(state))
}

/// Build the whole dashboard body.
pub fn view(state: &AppState) -> DomNode {
    let mut jumbotron = DomNode::element("div")
        .with_class("jumbotron")
        .with_child(greeting(&state.user.name))
        .with_child(DomNode::text("p", LEAD).with_class("lead"));
    if let Some(message) = &state.error {
        jumbotron = jumbotron.with_child(error_alert(state, message));
    }

    let main = DomNode::element("main")
        .with_class("container-fluid")
        .with_child(jumbotron)
        .with_child(rover_row(state))
        .with_child(gallery_row(state));

    DomNode::element("div")
        .with_key("app")
        .with_class("app")
        .with_child(DomNode::text("header", TITLE).with_class("container-fluid"))
        .with_child(main)
        .with_child(DomNode::element("footer"))
}

pub fn greeting(name: &str) -> DomNode {
    let text = if name.is_empty() {
        "Hello!".to_string()
    } else {
        format!("Welcome, {}!", name)
    };
    DomNode::text("h1", &text).with_class("display-4")
}

/// Placeholder shown while the rover list is not loaded.
pub fn spinner() -> DomNode {
    DomNode::element("div")
        .with_class("text-center spinner-grow text-success")
        .with_attr("role", "status")
        .with_child(DomNode::text("span", LOADING).with_class("visually-hidden"))
}

fn busy_indicator() -> DomNode {
    DomNode::element("div")
        .with_class("spinner-border text-success")
        .with_attr("role", "status")
        .with_child(DomNode::text("span", LOADING).with_class("visually-hidden"))
}

/// Retry repeats whatever failed: the photo request of a settled selection,
/// otherwise the rover list.
fn error_alert(state: &AppState, message: &str) -> DomNode {
    let retry = DomNode::text("button", "Retry")
        .with_class("btn btn-link")
        .with_attr("type", "button");
    let retry = match state.failed_selection() {
        Some(rover) => retry.with_attr(ROVER_ATTR, &rover.name).on("click", SELECT_ROVER),
        None => retry.on("click", RELOAD),
    };

    DomNode::element("div")
        .with_key("error")
        .with_class("alert alert-danger")
        .with_attr("role", "alert")
        .with_child(DomNode::bare_text(message))
        .with_child(retry)
        .with_child(
            DomNode::text("button", "Dismiss")
                .with_class("btn btn-link")
                .with_attr("type", "button")
                .on("click", DISMISS_ERROR),
        )
}

fn rover_row(state: &AppState) -> DomNode {
    let row = DomNode::element("div").with_key("rovers").with_class("row");
    match state.rovers.as_deref() {
        None => row.with_child(spinner()),
        Some(rovers) => row.with_children(rovers.iter().map(|r| rover_card(state, r))),
    }
}

pub fn rover_card(state: &AppState, rover: &Rover) -> DomNode {
    let mut button = DomNode::element("button")
        .with_class("btn btn-light")
        .with_attr("type", "button")
        .with_attr(ROVER_ATTR, &rover.name)
        .on("click", SELECT_ROVER);
    button = if state.is_loading(&rover.name) {
        button.with_child(busy_indicator())
    } else {
        button.with_text(SEE_LATEST)
    };

    let body = DomNode::element("div")
        .with_class("card-body")
        .with_child(DomNode::text("h5", &rover.name).with_class("card-title"))
        .with_child(DomNode::text("p", &rover_summary(rover)).with_class("card-text"))
        .with_child(button);

    DomNode::element("div")
        .with_key(&format!("rover-{}", rover.name))
        .with_class("col-sm-6 mb-2")
        .with_child(DomNode::element("div").with_class("card").with_child(body))
}

pub fn rover_summary(rover: &Rover) -> String {
    format!(
        "This rover launched in {}, landed on Mars in {} and is now {}",
        rover.launch_date, rover.landing_date, rover.status
    )
}

fn gallery_row(state: &AppState) -> DomNode {
    let row = DomNode::element("div")
        .with_key("gallery")
        .with_class("row row-cols-1 row-cols-md-3");
    match &state.selected_rover_gal {
        None => row,
        Some(gallery) => row.with_children(gallery.photos.iter().map(photo_card)),
    }
}

pub fn photo_card(photo: &Photo) -> DomNode {
    let mut text = DomNode::element("p").with_class("card-text");
    for (i, sentence) in photo_description(photo).iter().enumerate() {
        if i > 0 {
            text = text
                .with_child(DomNode::element("br"))
                .with_child(DomNode::element("br"));
        }
        text = text.with_child(DomNode::bare_text(sentence));
    }

    let body = DomNode::element("div")
        .with_class("card-body")
        .with_child(DomNode::text("h5", &photo_title(photo)).with_class("card-title"))
        .with_child(text);

    let card = DomNode::element("div")
        .with_class("card h-100")
        .with_child(
            DomNode::element("img")
                .with_class("card-img-top")
                .with_attr("src", &photo.img_src)
                .with_attr("alt", &photo.camera.full_name),
        )
        .with_child(body);

    DomNode::element("div").with_class("col mb-4").with_child(card)
}

pub fn photo_title(photo: &Photo) -> String {
    format!("{} - {}", photo.rover.name, photo.camera.full_name)
}

/// "a" or "an" before a status word: only "active" takes "an".
pub fn status_article(status: &str) -> &'static str {
    if status == crate::state::ACTIVE_STATUS {
        "an"
    } else {
        "a"
    }
}

/// The sentences describing a photo, in display order.
pub fn photo_description(photo: &Photo) -> Vec<String> {
    let rover = &photo.rover;
    vec![
        format!("This is a photo from {} for {}.", photo.camera.full_name, rover.name),
        format!("{} has {} {} status.", rover.name, status_article(&rover.status), rover.status),
        format!("{} landed on Mars in {}", rover.name, rover.landing_date),
        format!("This project was launched in {}", rover.launch_date),
        format!("This picture was taken on {}", photo.earth_date),
    ]
}
