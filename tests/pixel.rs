mod tests {
    use ws2812_strip::pixel::IndexOutOfRange;
    use ws2812_strip::{ChannelModel, Direction, PixelBuffer, Rgbw, palette};

    const LEDS: usize = 4;

    fn rgb_buffer() -> PixelBuffer<{ LEDS * 3 }> {
        PixelBuffer::new(LEDS, ChannelModel::Rgb)
    }

    fn rgbw_buffer() -> PixelBuffer<{ LEDS * 4 }> {
        PixelBuffer::new(LEDS, ChannelModel::Rgbw)
    }

    #[test]
    fn test_new_is_black_and_sized() {
        let buffer = rgb_buffer();
        assert_eq!(buffer.led_count(), LEDS);
        assert_eq!(buffer.as_bytes(), &[0; LEDS * 3]);

        let buffer = rgbw_buffer();
        assert_eq!(buffer.as_bytes().len(), LEDS * 4);
    }

    #[test]
    fn test_set_reorders_into_wire_order() {
        let mut buffer = rgb_buffer();
        buffer.set(1, Rgbw::new(1, 2, 3, 4)).unwrap();
        // Wire order is green, red, blue; white is dropped on RGB strips.
        assert_eq!(buffer.led(1), Some(&[2, 1, 3][..]));

        let mut buffer = rgbw_buffer();
        buffer.set(3, Rgbw::new(1, 2, 3, 4)).unwrap();
        assert_eq!(buffer.led(3), Some(&[2, 1, 3, 4][..]));
    }

    #[test]
    fn test_set_out_of_range_leaves_buffer_untouched() {
        let mut buffer = rgb_buffer();
        buffer.set(0, palette::WHITE).unwrap();
        let before: Vec<u8> = buffer.as_bytes().to_vec();

        let err = buffer.set(LEDS, palette::RED).unwrap_err();
        assert_eq!(
            err,
            IndexOutOfRange {
                index: LEDS,
                led_count: LEDS
            }
        );
        assert_eq!(buffer.as_bytes(), &before[..]);
        assert_eq!(buffer.led(LEDS), None);
    }

    #[test]
    fn test_fill_and_clear() {
        let mut buffer = rgb_buffer();
        buffer.fill(Rgbw::rgb(10, 20, 30));
        for index in 0..LEDS {
            assert_eq!(buffer.led(index), Some(&[20, 10, 30][..]));
        }

        buffer.clear();
        assert_eq!(buffer.as_bytes(), &[0; LEDS * 3]);
    }

    #[test]
    fn test_rotate_forward_wraps_last_to_front() {
        let mut buffer = rgb_buffer();
        for index in 0..LEDS {
            buffer.set(index, Rgbw::rgb(index as u8, 0, 0)).unwrap();
        }
        buffer.rotate(1, Direction::Forward);
        assert_eq!(buffer.led(0), Some(&[0, 3, 0][..]));
        assert_eq!(buffer.led(1), Some(&[0, 0, 0][..]));
        assert_eq!(buffer.led(3), Some(&[0, 2, 0][..]));
    }

    #[test]
    fn test_rotate_round_trip() {
        let mut buffer = rgbw_buffer();
        for index in 0..LEDS {
            let value = index as u8;
            buffer
                .set(index, Rgbw::new(value, value + 1, value + 2, value + 3))
                .unwrap();
        }
        let original: Vec<u8> = buffer.as_bytes().to_vec();

        buffer.rotate(1, Direction::Forward);
        assert_ne!(buffer.as_bytes(), &original[..]);
        buffer.rotate(1, Direction::Backward);
        assert_eq!(buffer.as_bytes(), &original[..]);
    }

    #[test]
    fn test_rotate_full_cycle_is_identity() {
        let mut buffer = rgb_buffer();
        for index in 0..LEDS {
            buffer.set(index, Rgbw::rgb(0, index as u8, 0)).unwrap();
        }
        let original: Vec<u8> = buffer.as_bytes().to_vec();

        buffer.rotate(LEDS, Direction::Forward);
        assert_eq!(buffer.as_bytes(), &original[..]);
    }

    #[test]
    fn test_rotate_large_step_counts_wrap() {
        let mut reference = rgb_buffer();
        let mut buffer = rgb_buffer();
        for index in 0..LEDS {
            reference.set(index, Rgbw::rgb(index as u8, 0, 0)).unwrap();
            buffer.set(index, Rgbw::rgb(index as u8, 0, 0)).unwrap();
        }

        // 4005 steps on 4 LEDs is one step.
        buffer.rotate(4005, Direction::Forward);
        reference.rotate(1, Direction::Forward);
        assert_eq!(buffer.as_bytes(), reference.as_bytes());
    }

    #[test]
    fn test_single_led_rotation_is_identity() {
        let mut buffer: PixelBuffer<3> = PixelBuffer::new(1, ChannelModel::Rgb);
        buffer.set(0, palette::NAVY).unwrap();
        let original: Vec<u8> = buffer.as_bytes().to_vec();

        buffer.rotate(5, Direction::Forward);
        assert_eq!(buffer.as_bytes(), &original[..]);
    }
}
