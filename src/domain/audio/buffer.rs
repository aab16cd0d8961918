//! Audio Context - 解码后的采样缓冲
//!
//! 不变量:
//! - 构造后不可变
//! - 所有声道等长（帧数 = 总采样数 / 声道数，整除截断）
//! - 采样值为 s / 32768.0 归一化结果，不做削波修正

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::errors::DecodeError;

/// i16 采样归一化除数
///
/// 保持 32768.0（而不是 32767.0）以与既有录制结果逐位兼容：
/// -32768 映射为恰好 -1.0，正向最大值略小于 1.0
const PCM_SCALE: f32 = 32768.0;

/// 解码 base64 负载为原始字节
///
/// 严格模式：非法字母表字符或错误的 padding 一律报错，不产生部分结果
pub fn decode_base64_payload(payload: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(payload)?)
}

/// 解码后的音频缓冲
///
/// 按声道分离存储的归一化 f32 采样，范围约 [-1.0, 0.99997]
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// 每声道的采样序列
    channels: Vec<Vec<f32>>,
    /// 采样率（Hz）
    sample_rate: u32,
}

impl AudioBuffer {
    /// 从原始 16-bit LE PCM 字节构造缓冲
    ///
    /// - 字节按 i16 小端解释，声道交错排列（声道 ch 的第 i 帧位于
    ///   平坦索引 i * channel_count + ch）
    /// - 字节长度不是 2 * channel_count 整数倍时，尾部不完整帧静默截断
    pub fn from_pcm16_le(
        bytes: &[u8],
        sample_rate: u32,
        channel_count: usize,
    ) -> Result<Self, DecodeError> {
        if channel_count == 0 {
            return Err(DecodeError::InvalidChannelCount(channel_count));
        }
        if sample_rate == 0 {
            return Err(DecodeError::InvalidSampleRate(sample_rate));
        }

        let total_samples = bytes.len() / 2;
        let frame_count = total_samples / channel_count;

        let mut channels = vec![Vec::with_capacity(frame_count); channel_count];
        for (ch, data) in channels.iter_mut().enumerate() {
            for i in 0..frame_count {
                let flat = (i * channel_count + ch) * 2;
                let sample = i16::from_le_bytes([bytes[flat], bytes[flat + 1]]);
                data.push(sample as f32 / PCM_SCALE);
            }
        }

        Ok(Self {
            channels,
            sample_rate,
        })
    }

    /// 从已分离的声道数据构造缓冲
    ///
    /// 声道长度不一致时按最短声道截断
    pub fn from_channels(mut channels: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let frames = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        for channel in &mut channels {
            channel.truncate(frames);
        }
        Self {
            channels,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// 帧数（每声道采样数）
    pub fn frame_count(&self) -> usize {
        self.channels.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn channel(&self, ch: usize) -> &[f32] {
        &self.channels[ch]
    }

    pub fn duration_ms(&self) -> u64 {
        (self.frame_count() as u64 * 1000) / self.sample_rate as u64
    }

    /// 重新交错为平坦采样序列（供输出适配器使用）
    pub fn interleaved(&self) -> Vec<f32> {
        let frames = self.frame_count();
        let mut out = Vec::with_capacity(frames * self.channels.len());
        for i in 0..frames {
            for ch in &self.channels {
                out.push(ch[i]);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_bytes(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    #[test]
    fn test_sample_scaling_is_divide_by_32768() {
        let bytes = pcm_bytes(&[0, 1, -1, 16384, 32767]);
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 1).unwrap();

        assert_eq!(buf.channel(0)[0], 0.0);
        assert_eq!(buf.channel(0)[1], 1.0 / 32768.0);
        assert_eq!(buf.channel(0)[2], -1.0 / 32768.0);
        assert_eq!(buf.channel(0)[3], 0.5);
        assert_eq!(buf.channel(0)[4], 32767.0 / 32768.0);
        // 正向最大值达不到 1.0
        assert!(buf.channel(0)[4] < 1.0);
    }

    #[test]
    fn test_min_sample_decodes_to_exactly_minus_one() {
        let bytes = pcm_bytes(&[i16::MIN]);
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 1).unwrap();
        assert_eq!(buf.channel(0)[0], -1.0);
    }

    #[test]
    fn test_stereo_deinterleaving() {
        // 帧序列 [(L0,R0), (L1,R1), (L2,R2)]
        let bytes = pcm_bytes(&[100, -100, 200, -200, 300, -300]);
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 2).unwrap();

        assert_eq!(buf.channel_count(), 2);
        assert_eq!(buf.frame_count(), 3);
        assert_eq!(
            buf.channel(0),
            &[100.0 / 32768.0, 200.0 / 32768.0, 300.0 / 32768.0]
        );
        assert_eq!(
            buf.channel(1),
            &[-100.0 / 32768.0, -200.0 / 32768.0, -300.0 / 32768.0]
        );
    }

    #[test]
    fn test_trailing_partial_frame_is_truncated() {
        // 立体声每帧 4 字节；10 字节 = 2 完整帧 + 半帧
        let mut bytes = pcm_bytes(&[1, 2, 3, 4]);
        bytes.extend_from_slice(&5i16.to_le_bytes());
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 2).unwrap();
        assert_eq!(buf.frame_count(), 2);

        // 奇数字节同样截断，不报错
        let buf = AudioBuffer::from_pcm16_le(&[0x01, 0x02, 0x03], 24000, 1).unwrap();
        assert_eq!(buf.frame_count(), 1);
    }

    #[test]
    fn test_zero_channel_count_is_error() {
        let result = AudioBuffer::from_pcm16_le(&[0, 0], 24000, 0);
        assert!(matches!(result, Err(DecodeError::InvalidChannelCount(0))));
    }

    #[test]
    fn test_interleaved_round_trip() {
        let bytes = pcm_bytes(&[10, 20, 30, 40]);
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 2).unwrap();
        assert_eq!(
            buf.interleaved(),
            vec![
                10.0 / 32768.0,
                20.0 / 32768.0,
                30.0 / 32768.0,
                40.0 / 32768.0
            ]
        );
    }

    #[test]
    fn test_decode_base64_payload_strict() {
        assert_eq!(decode_base64_payload("AAEC").unwrap(), vec![0, 1, 2]);
        // 非法字符
        assert!(decode_base64_payload("!!!!").is_err());
        // 错误 padding
        assert!(decode_base64_payload("AAECA").is_err());
    }

    #[test]
    fn test_duration() {
        let bytes = vec![0u8; 24000 * 2];
        let buf = AudioBuffer::from_pcm16_le(&bytes, 24000, 1).unwrap();
        assert_eq!(buf.duration_ms(), 1000);
    }
}
