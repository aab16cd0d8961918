//! Cpal Audio Output - 宿主扬声器播放
//!
//! cpal 的 Stream 不是 Send，因此由一条专用音频线程独占持有
//! 输出流与环形缓冲的生产者端；播放任务通过通道投递。
//! 播放上下文在首次播放时惰性创建，之后复用

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Stream, StreamConfig};
use parking_lot::Mutex;
use ringbuf::{
    traits::{Consumer, Observer, Producer, Split},
    HeapRb,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use async_trait::async_trait;

use crate::application::ports::{AudioOutputPort, PlaybackError, PlaybackHandle};
use crate::domain::audio::AudioBuffer;

// 约 250ms 的 48kHz 立体声缓冲
const RING_BUFFER_SIZE: usize = 48000 * 2 / 4;

type RingProducer = ringbuf::HeapProd<f32>;
type RingConsumer = ringbuf::HeapCons<f32>;

/// 投递给音频线程的播放任务
struct PlayJob {
    buffer: AudioBuffer,
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
}

/// 一次播放的句柄
struct CpalPlaybackHandle {
    stop: Arc<AtomicBool>,
    finished: Arc<AtomicBool>,
    /// 置位后音频回调清空环形缓冲，立即静默
    clear_flag: Arc<AtomicBool>,
}

impl PlaybackHandle for CpalPlaybackHandle {
    fn stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
        self.clear_flag.store(true, Ordering::SeqCst);
    }

    fn is_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst) || self.stop.load(Ordering::SeqCst)
    }
}

/// 音频线程持有的播放上下文
struct PlaybackContext {
    _stream: Stream,
    producer: RingProducer,
    device_rate: u32,
    device_channels: u16,
}

impl PlaybackContext {
    fn init(clear_flag: Arc<AtomicBool>) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| PlaybackError::DeviceUnavailable("No output device".to_string()))?;
        let config = device
            .default_output_config()
            .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;

        let device_rate = config.sample_rate().0;
        let device_channels = config.channels();

        let rb = HeapRb::<f32>::new(RING_BUFFER_SIZE);
        let (producer, consumer) = rb.split();

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                build_stream::<f32>(&device, &config.into(), consumer, clear_flag)?
            }
            cpal::SampleFormat::I16 => {
                build_stream::<i16>(&device, &config.into(), consumer, clear_flag)?
            }
            cpal::SampleFormat::U16 => {
                build_stream::<u16>(&device, &config.into(), consumer, clear_flag)?
            }
            format => {
                return Err(PlaybackError::UnsupportedFormat(format!("{:?}", format)));
            }
        };

        stream
            .play()
            .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;

        tracing::info!(
            device_rate = device_rate,
            device_channels = device_channels,
            "Playback context initialized"
        );

        Ok(Self {
            _stream: stream,
            producer,
            device_rate,
            device_channels,
        })
    }
}

fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut consumer: RingConsumer,
    clear_flag: Arc<AtomicBool>,
) -> Result<Stream, PlaybackError> {
    let stream = device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                if clear_flag.swap(false, Ordering::SeqCst) {
                    while consumer.try_pop().is_some() {}
                }
                for sample in data.iter_mut() {
                    let value = consumer.try_pop().unwrap_or(0.0);
                    *sample = T::from_sample(value);
                }
            },
            move |err| {
                tracing::error!(error = %err, "Audio output stream error");
            },
            None,
        )
        .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;

    Ok(stream)
}

/// 把解码后的缓冲重采样并映射到设备声道布局，输出交错样本
///
/// 线性插值重采样；源声道数少于设备时复制最后一个声道，
/// 多于设备时丢弃多余声道
fn adapt_to_device(buffer: &AudioBuffer, device_rate: u32, device_channels: u16) -> Vec<f32> {
    let src_frames = buffer.frame_count();
    let src_channels = buffer.channel_count();
    let dst_channels = device_channels as usize;

    if src_frames == 0 || src_channels == 0 {
        return Vec::new();
    }

    if buffer.sample_rate() == device_rate && src_channels == dst_channels {
        return buffer.interleaved();
    }

    let dst_frames = (src_frames as u64 * device_rate as u64 / buffer.sample_rate() as u64) as usize;
    let mut out = Vec::with_capacity(dst_frames * dst_channels);

    for j in 0..dst_frames {
        let pos = j as f64 * buffer.sample_rate() as f64 / device_rate as f64;
        let i0 = pos as usize;
        let i1 = (i0 + 1).min(src_frames - 1);
        let frac = (pos - i0 as f64) as f32;

        for ch in 0..dst_channels {
            let src_ch = ch.min(src_channels - 1);
            let channel = buffer.channel(src_ch);
            let s0 = channel[i0.min(src_frames - 1)];
            let s1 = channel[i1];
            out.push(s0 + (s1 - s0) * frac);
        }
    }

    out
}

/// 音频线程主循环：逐任务送入环形缓冲，支持中途停止
fn run_worker(rx: mpsc::Receiver<PlayJob>, mut context: PlaybackContext) {
    for job in rx.iter() {
        if job.stop.load(Ordering::SeqCst) {
            job.finished.store(true, Ordering::SeqCst);
            continue;
        }

        let samples = adapt_to_device(&job.buffer, context.device_rate, context.device_channels);
        let mut offset = 0;

        while offset < samples.len() {
            if job.stop.load(Ordering::SeqCst) {
                break;
            }
            if context.producer.try_push(samples[offset]).is_ok() {
                offset += 1;
            } else {
                std::thread::sleep(Duration::from_millis(1));
            }
        }

        // 等待缓冲排空（或被停止）再标记结束
        while !job.stop.load(Ordering::SeqCst) && context.producer.occupied_len() > 0 {
            std::thread::sleep(Duration::from_millis(5));
        }
        job.finished.store(true, Ordering::SeqCst);
    }

    tracing::debug!("Audio worker stopped");
}

/// Cpal 音频输出适配器
pub struct CpalAudioOutput {
    /// 首次播放时创建的任务通道
    worker: Mutex<Option<mpsc::Sender<PlayJob>>>,
    clear_flag: Arc<AtomicBool>,
}

impl CpalAudioOutput {
    pub fn new() -> Self {
        Self {
            worker: Mutex::new(None),
            clear_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 惰性启动音频线程；初始化失败时不缓存，下次播放重试
    fn ensure_worker(&self) -> Result<mpsc::Sender<PlayJob>, PlaybackError> {
        let mut worker = self.worker.lock();
        if let Some(sender) = worker.as_ref() {
            return Ok(sender.clone());
        }

        let (job_tx, job_rx) = mpsc::channel::<PlayJob>();
        let (init_tx, init_rx) = mpsc::channel::<Result<(), PlaybackError>>();
        let clear_flag = self.clear_flag.clone();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match PlaybackContext::init(clear_flag) {
                Ok(context) => {
                    let _ = init_tx.send(Ok(()));
                    run_worker(job_rx, context);
                }
                Err(e) => {
                    let _ = init_tx.send(Err(e));
                }
            })
            .map_err(|e| PlaybackError::DeviceUnavailable(e.to_string()))?;

        init_rx
            .recv()
            .map_err(|_| PlaybackError::WorkerStopped)??;

        *worker = Some(job_tx.clone());
        Ok(job_tx)
    }
}

impl Default for CpalAudioOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioOutputPort for CpalAudioOutput {
    async fn play(&self, buffer: AudioBuffer) -> Result<Arc<dyn PlaybackHandle>, PlaybackError> {
        let sender = self.ensure_worker()?;

        let stop = Arc::new(AtomicBool::new(false));
        let finished = Arc::new(AtomicBool::new(false));
        let job = PlayJob {
            buffer,
            stop: stop.clone(),
            finished: finished.clone(),
        };

        sender.send(job).map_err(|_| PlaybackError::WorkerStopped)?;

        Ok(Arc::new(CpalPlaybackHandle {
            stop,
            finished,
            clear_flag: self.clear_flag.clone(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(channels: Vec<Vec<f32>>, sample_rate: u32) -> AudioBuffer {
        // 通过交错字节路径构造太绕，测试直接用公开构造器
        AudioBuffer::from_channels(channels, sample_rate)
    }

    #[test]
    fn test_adapt_identity() {
        let buf = buffer(vec![vec![0.1, 0.2, 0.3]], 24000);
        let out = adapt_to_device(&buf, 24000, 1);
        assert_eq!(out, vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_adapt_mono_to_stereo_duplicates() {
        let buf = buffer(vec![vec![0.5, -0.5]], 24000);
        let out = adapt_to_device(&buf, 24000, 2);
        assert_eq!(out, vec![0.5, 0.5, -0.5, -0.5]);
    }

    #[test]
    fn test_adapt_upsample_doubles_frames() {
        let buf = buffer(vec![vec![0.0, 1.0]], 24000);
        let out = adapt_to_device(&buf, 48000, 1);
        assert_eq!(out.len(), 4);
        // 线性插值中间值
        assert!((out[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_adapt_empty_buffer() {
        let buf = buffer(vec![vec![]], 24000);
        assert!(adapt_to_device(&buf, 48000, 2).is_empty());
    }

    #[test]
    fn test_handle_stop_marks_finished() {
        let handle = CpalPlaybackHandle {
            stop: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
            clear_flag: Arc::new(AtomicBool::new(false)),
        };
        assert!(!handle.is_finished());
        handle.stop();
        handle.stop();
        assert!(handle.is_finished());
        assert!(handle.clear_flag.load(Ordering::SeqCst));
    }
}
