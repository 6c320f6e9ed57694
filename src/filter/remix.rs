/// Average interleaved multi-channel samples into mono and append them to `output`
///
/// A trailing partial frame is averaged over the channels it has.
pub fn downmix_into(output: &mut Vec<f32>, interleaved: &[f32], channels: usize) {
    if channels <= 1 {
        output.extend_from_slice(interleaved);
        return;
    }

    output.reserve(interleaved.len() / channels + 1);
    for frame in interleaved.chunks(channels) {
        let sum: f32 = frame.iter().sum();
        output.push(sum / frame.len() as f32);
    }
}
