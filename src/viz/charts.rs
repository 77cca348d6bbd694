use plotters::prelude::*;

use crate::error::ScanError;

// Palette carried over from the web UI: spam red, ham teal, purple bars.
const SPAM_COLOR: RGBColor = RGBColor(0xff, 0x6b, 0x6b);
const HAM_COLOR: RGBColor = RGBColor(0x4e, 0xcd, 0xc4);
const BAR_COLOR: RGBColor = RGBColor(0x6c, 0x5c, 0xe7);

const HISTOGRAM_BINS: usize = 10;

fn render_failed(err: impl std::fmt::Display) -> ScanError {
    ScanError::Storage(format!("chart rendering failed: {err}"))
}

fn encode_png(buffer: &[u8], width: u32, height: u32) -> Result<Vec<u8>, ScanError> {
    use image::ImageEncoder;

    let mut png = Vec::new();
    image::codecs::png::PngEncoder::new(&mut png)
        .write_image(buffer, width, height, image::ColorType::Rgb8)
        .map_err(render_failed)?;
    Ok(png)
}

/// Spam vs ham proportion as a pie, drawn from sector polygons.
pub fn render_pie(spam_count: usize, ham_count: usize) -> Result<Vec<u8>, ScanError> {
    let (width, height) = (640u32, 640u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_failed)?;

        let total = (spam_count + ham_count) as f64;
        let center = (320i32, 320i32);
        let radius = 260.0f64;
        let mut start = -std::f64::consts::FRAC_PI_2;

        for (count, color) in [(spam_count, SPAM_COLOR), (ham_count, HAM_COLOR)] {
            if count == 0 {
                continue;
            }
            let sweep = std::f64::consts::TAU * count as f64 / total;
            let steps = ((sweep / 0.01).ceil() as usize).max(2);
            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for step in 0..=steps {
                let angle = start + sweep * step as f64 / steps as f64;
                points.push((
                    center.0 + (radius * angle.cos()).round() as i32,
                    center.1 + (radius * angle.sin()).round() as i32,
                ));
            }
            root.draw(&Polygon::new(points, color.filled()))
                .map_err(render_failed)?;
            start += sweep;
        }
        root.present().map_err(render_failed)?;
    }
    encode_png(&buffer, width, height)
}

/// Spam and ham confidence distributions, ten bins over 0..=100, drawn
/// overlaid with translucent fills.
pub fn render_confidence_histogram(
    spam_confidences: &[f64],
    ham_confidences: &[f64],
) -> Result<Vec<u8>, ScanError> {
    let spam_bins = bin_counts(spam_confidences);
    let ham_bins = bin_counts(ham_confidences);
    let tallest = spam_bins
        .iter()
        .chain(ham_bins.iter())
        .copied()
        .max()
        .unwrap_or(0)
        .max(1);

    let (width, height) = (800u32, 480u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_failed)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(0.0f64..100.0, 0u32..tallest + 1)
            .map_err(render_failed)?;

        for (bins, color) in [(&spam_bins, SPAM_COLOR), (&ham_bins, HAM_COLOR)] {
            chart
                .draw_series(bins.iter().enumerate().filter(|(_, &c)| c > 0).map(
                    |(bin, &count)| {
                        let x0 = bin as f64 * 10.0;
                        Rectangle::new([(x0, 0), (x0 + 10.0, count)], color.mix(0.7).filled())
                    },
                ))
                .map_err(render_failed)?;
        }
        root.present().map_err(render_failed)?;
    }
    encode_png(&buffer, width, height)
}

/// Aggregate word influence as a descending horizontal bar chart; `totals`
/// arrives already ranked, strongest first.
pub fn render_word_influence(totals: &[(String, f64)]) -> Result<Vec<u8>, ScanError> {
    let bars = totals.len().max(1);
    let strongest = totals
        .first()
        .map(|(_, weight)| *weight)
        .filter(|w| *w > 0.0)
        .unwrap_or(1.0);

    let (width, height) = (960u32, 640u32);
    let mut buffer = vec![0u8; (width * height * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_failed)?;

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .build_cartesian_2d(0.0f64..strongest * 1.05, 0.0f64..bars as f64)
            .map_err(render_failed)?;

        chart
            .draw_series(totals.iter().enumerate().map(|(rank, (_, weight))| {
                // Strongest bar at the top of the chart.
                let y = (bars - 1 - rank) as f64;
                Rectangle::new([(0.0, y + 0.1), (*weight, y + 0.9)], BAR_COLOR.filled())
            }))
            .map_err(render_failed)?;
        root.present().map_err(render_failed)?;
    }
    encode_png(&buffer, width, height)
}

fn bin_counts(values: &[f64]) -> [u32; HISTOGRAM_BINS] {
    let mut bins = [0u32; HISTOGRAM_BINS];
    for &value in values {
        let bin = ((value / 10.0).floor() as usize).min(HISTOGRAM_BINS - 1);
        bins[bin] += 1;
    }
    bins
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 4] = [0x89, b'P', b'N', b'G'];

    #[test]
    fn bins_cover_the_full_confidence_range() {
        let bins = bin_counts(&[0.0, 9.9, 10.0, 55.5, 99.99, 100.0]);
        assert_eq!(bins[0], 2);
        assert_eq!(bins[1], 1);
        assert_eq!(bins[5], 1);
        assert_eq!(bins[9], 2);
    }

    #[test]
    fn pie_renders_a_png_even_for_one_sided_batches() {
        let png = render_pie(3, 0).unwrap();
        assert_eq!(&png[..4], &PNG_MAGIC);
    }

    #[test]
    fn histogram_renders_with_an_empty_subset() {
        let png = render_confidence_histogram(&[91.0, 77.5], &[]).unwrap();
        assert_eq!(&png[..4], &PNG_MAGIC);
    }

    #[test]
    fn word_influence_renders_even_with_no_words() {
        let png = render_word_influence(&[]).unwrap();
        assert_eq!(&png[..4], &PNG_MAGIC);
    }
}
