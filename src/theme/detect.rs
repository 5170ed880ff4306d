use super::ThemeVariant;

/// Luma above which the terminal background counts as light.
const LIGHT_LUMA: f32 = 0.6;

/// Guess the terminal background from its reported luma. Terminals that
/// don't answer get the dark theme.
pub fn detect_terminal_theme() -> ThemeVariant {
    match terminal_light::luma() {
        Ok(luma) => variant_for_luma(luma),
        Err(e) => {
            tracing::debug!(error = %e, "terminal background query failed");
            ThemeVariant::Dark
        }
    }
}

fn variant_for_luma(luma: f32) -> ThemeVariant {
    if luma > LIGHT_LUMA {
        ThemeVariant::Light
    } else {
        ThemeVariant::Dark
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_for_luma() {
        assert_eq!(variant_for_luma(0.95), ThemeVariant::Light);
        assert_eq!(variant_for_luma(0.1), ThemeVariant::Dark);
        assert_eq!(variant_for_luma(0.6), ThemeVariant::Dark);
    }
}
