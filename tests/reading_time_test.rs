use cms_feed::types::{BodySegment, ContentSection, Post};
use cms_feed::{reading_time, utils};

fn post_with_content(content: Vec<ContentSection>) -> Post {
    Post {
        uid: "p1".to_string(),
        publication_date: None,
        title: "A title".to_string(),
        subtitle: String::new(),
        author: "Jane Doe".to_string(),
        banner: None,
        content,
    }
}

fn section(heading: &str, bodies: &[&str]) -> ContentSection {
    ContentSection {
        heading: heading.to_string(),
        body: bodies
            .iter()
            .map(|text| BodySegment {
                text: text.to_string(),
            })
            .collect(),
    }
}

#[test]
fn test_short_post_floors_at_one_minute() {
    // 2 heading words + 5 body words, well under one minute at 200 wpm.
    let post = post_with_content(vec![section("<h2>Hello World</h2>", &["<p>a b c d e</p>"])]);
    assert_eq!(reading_time::estimate(&post), 1);
}

#[test]
fn test_empty_content_estimates_zero() {
    let post = post_with_content(vec![]);
    assert_eq!(reading_time::estimate(&post), 0);

    let blank = post_with_content(vec![section("", &["<p>   </p>"])]);
    assert_eq!(reading_time::estimate(&blank), 0);
}

#[test]
fn test_estimate_rounds_up() {
    assert_eq!(reading_time::estimate_words(0), 0);
    assert_eq!(reading_time::estimate_words(1), 1);
    assert_eq!(reading_time::estimate_words(200), 1);
    assert_eq!(reading_time::estimate_words(201), 2);
    assert_eq!(reading_time::estimate_words(1000), 5);
}

#[test]
fn test_words_counted_across_all_sections() {
    // 250 words across two sections: ceil(250 / 200) = 2.
    let body_a = format!("<p>{}</p>", vec!["word"; 120].join(" "));
    let body_b = format!("<p>{}</p>", vec!["word"; 126].join(" "));
    let post = post_with_content(vec![
        section("<h2>One two</h2>", &[&body_a]),
        section("<h2>Three four</h2>", &[&body_b]),
    ]);
    assert_eq!(reading_time::estimate(&post), 2);
}

#[test]
fn test_html_tags_do_not_count_as_words() {
    let stripped = utils::strip_html("<p><strong>bold</strong> and <em>italic</em></p>");
    assert_eq!(stripped, "bold and italic");

    let post = post_with_content(vec![section("", &["<p><strong>one</strong> two</p>"])]);
    assert_eq!(reading_time::estimate(&post), 1);
}
