//! Text output formatter

use deckview_core::Slide;

pub fn output_text(slides: &[Slide]) {
    for (index, slide) in slides.iter().enumerate() {
        let title = if slide.title.is_empty() {
            "(untitled)"
        } else {
            slide.title.as_str()
        };
        println!("{:>3}  {:<40} {}", index, title, slide.address);
    }

    println!();
    println!("{} slides", slides.len());
}
