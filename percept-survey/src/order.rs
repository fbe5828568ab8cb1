use percept_core::ImageDescriptor;
use rand::seq::SliceRandom;
use rand::Rng;

/// How the filtered image set is ordered when a survey starts.
///
/// Earlier builds of the survey disagreed on whether "both" mode should
/// group or interleave light and dark trials, so the policy is explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingPolicy {
    /// Shuffle, then group all light-mode trials before dark-mode ones.
    #[default]
    GroupedByMode,
    /// Shuffle across modes.
    Interleaved,
    /// Keep the image source's order untouched.
    SourceOrder,
}

pub fn apply<R: Rng + ?Sized>(
    policy: OrderingPolicy,
    images: &mut [ImageDescriptor],
    rng: &mut R,
) {
    match policy {
        OrderingPolicy::SourceOrder => {}
        OrderingPolicy::Interleaved => images.shuffle(rng),
        OrderingPolicy::GroupedByMode => {
            images.shuffle(rng);
            // Stable sort keeps the shuffled order within each group.
            images.sort_by_key(|image| image.mode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use percept_core::DisplayMode;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn descriptors() -> Vec<ImageDescriptor> {
        [
            ("a", DisplayMode::Dark),
            ("b", DisplayMode::Light),
            ("c", DisplayMode::Dark),
            ("d", DisplayMode::Light),
            ("e", DisplayMode::Light),
        ]
        .into_iter()
        .map(|(name, mode)| ImageDescriptor::new(format!("/images/{name}.svg"), name, mode))
        .collect()
    }

    #[test]
    fn source_order_is_identity() {
        let mut images = descriptors();
        let before = images.clone();
        apply(OrderingPolicy::SourceOrder, &mut images, &mut StdRng::seed_from_u64(1));
        assert_eq!(images, before);
    }

    #[test]
    fn grouped_puts_all_light_first() {
        let mut images = descriptors();
        apply(OrderingPolicy::GroupedByMode, &mut images, &mut StdRng::seed_from_u64(7));

        let first_dark = images
            .iter()
            .position(|i| i.mode == DisplayMode::Dark)
            .unwrap();
        assert!(images[..first_dark]
            .iter()
            .all(|i| i.mode == DisplayMode::Light));
        assert!(images[first_dark..]
            .iter()
            .all(|i| i.mode == DisplayMode::Dark));
        assert_eq!(images.len(), 5);
    }

    #[test]
    fn ordering_preserves_the_image_set() {
        let mut images = descriptors();
        apply(OrderingPolicy::Interleaved, &mut images, &mut StdRng::seed_from_u64(3));

        let mut names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        names.sort_unstable();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn fixed_seed_is_reproducible() {
        let mut first = descriptors();
        let mut second = descriptors();
        apply(OrderingPolicy::Interleaved, &mut first, &mut StdRng::seed_from_u64(42));
        apply(OrderingPolicy::Interleaved, &mut second, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }
}
