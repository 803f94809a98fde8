// Hand skeleton drawn over the video frame (never onto the canvas).
// Visual: thin lines along the finger bones with a small dot on every joint.

use image::{Rgb, RgbImage};

use crate::landmarks::{HAND_CONNECTIONS, HandLandmarks};

pub const BONE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);
pub const JOINT_COLOR: Rgb<u8> = Rgb([255, 0, 0]);
const JOINT_RADIUS: i32 = 2;

#[inline]
fn put_pixel(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x < 0 || y < 0 || x as u32 >= img.width() || y as u32 >= img.height() {
        return;
    }
    img.put_pixel(x as u32, y as u32, color);
}

/// 1-pixel Bresenham line.
fn line(img: &mut RgbImage, (mut x0, mut y0): (i32, i32), (x1, y1): (i32, i32), color: Rgb<u8>) {
    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        put_pixel(img, x0, y0, color);
        if x0 == x1 && y0 == y1 { break; }
        let e2 = 2 * err;
        if e2 >= dy { err += dy; x0 += sx; }
        if e2 <= dx { err += dx; y0 += sy; }
    }
}

fn dot(img: &mut RgbImage, (cx, cy): (i32, i32), color: Rgb<u8>) {
    for y in -JOINT_RADIUS..=JOINT_RADIUS {
        for x in -JOINT_RADIUS..=JOINT_RADIUS {
            if x * x + y * y <= JOINT_RADIUS * JOINT_RADIUS {
                put_pixel(img, cx + x, cy + y, color);
            }
        }
    }
}

/// Draw the tracked hand on top of `frame`.
pub fn draw_hand(frame: &mut RgbImage, hand: &HandLandmarks) {
    let (w, h) = frame.dimensions();
    let px: Vec<(i32, i32)> = hand.points.iter().map(|lm| lm.to_pixel(w, h)).collect();

    for &(a, b) in HAND_CONNECTIONS.iter() {
        line(frame, px[a], px[b], BONE_COLOR);
    }
    for &p in &px {
        dot(frame, p, JOINT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{INDEX_TIP, Landmark, WRIST};

    #[test]
    fn joints_and_bones_are_painted() {
        let mut pts = [Landmark::new(0.5, 0.5); 21];
        pts[WRIST] = Landmark::new(0.1, 0.5);
        pts[INDEX_TIP] = Landmark::new(0.9, 0.5);
        let hand = HandLandmarks::from_slice(&pts).unwrap();

        let mut frame = RgbImage::new(100, 10);
        draw_hand(&mut frame, &hand);

        assert_eq!(*frame.get_pixel(10, 5), JOINT_COLOR);
        assert_eq!(*frame.get_pixel(90, 5), JOINT_COLOR);
        // wrist -> thumb base runs along y=5 to the middle of the frame
        assert_eq!(*frame.get_pixel(30, 5), BONE_COLOR);
        assert_eq!(*frame.get_pixel(30, 0), Rgb([0, 0, 0]));
    }

    #[test]
    fn points_off_frame_do_not_panic() {
        let pts = [Landmark::new(-0.5, 1.7); 21];
        let hand = HandLandmarks::from_slice(&pts).unwrap();
        let mut frame = RgbImage::new(16, 16);
        draw_hand(&mut frame, &hand);
    }
}
