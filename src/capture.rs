//! 屏幕录制流追踪
//!
//! 浏览器端拦截屏幕共享请求，把授予的流交给 `CaptureTracker`。
//! 只要任意被追踪的流仍有未结束的轨道，就视为正在录制。
//! 轨道结束事件与定时轮询都调用 `refresh`，轮询兜底遗漏的事件。

/// 被追踪的媒体流
pub trait CaptureStream {
    /// 是否还有未结束的轨道
    fn is_live(&self) -> bool;
}

#[derive(Debug)]
pub struct CaptureTracker<S> {
    streams: Vec<S>,
    recording: bool,
}

impl<S> Default for CaptureTracker<S> {
    fn default() -> Self {
        Self {
            streams: Vec::new(),
            recording: false,
        }
    }
}

impl<S: CaptureStream> CaptureTracker<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录新授予的流；返回是否由此开始录制
    pub fn add(&mut self, stream: S) -> bool {
        let started = !self.recording;
        self.streams.push(stream);
        self.recording = true;
        if started {
            log_warn!("[CaptureGuard] Screen capture started, playback blocked");
        }
        started
    }

    /// 丢弃已结束的流；返回是否由此结束录制
    pub fn refresh(&mut self) -> bool {
        self.streams.retain(CaptureStream::is_live);
        let stopped = self.recording && self.streams.is_empty();
        if stopped {
            self.recording = false;
            log_info!("[CaptureGuard] Screen capture ended, playback allowed");
        }
        stopped
    }

    /// 录制状态只在 `add` 与 `refresh` 时改变
    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn tracked(&self) -> usize {
        self.streams.len()
    }

    pub fn clear(&mut self) {
        self.streams.clear();
        self.recording = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// 每个元素表示一条轨道是否仍在进行
    #[derive(Clone)]
    struct FakeStream(Rc<Vec<Cell<bool>>>);

    impl FakeStream {
        fn with_tracks(count: usize) -> Self {
            Self(Rc::new((0..count).map(|_| Cell::new(true)).collect()))
        }

        fn end_track(&self, index: usize) {
            self.0[index].set(false);
        }
    }

    impl CaptureStream for FakeStream {
        fn is_live(&self) -> bool {
            self.0.iter().any(Cell::get)
        }
    }

    #[test]
    fn test_recording_ends_when_all_tracks_of_all_streams_end() {
        let mut tracker = CaptureTracker::new();
        let first = FakeStream::with_tracks(2);
        let second = FakeStream::with_tracks(1);

        assert!(tracker.add(first.clone()));
        assert!(!tracker.add(second.clone()));
        assert!(tracker.is_recording());

        first.end_track(0);
        assert!(!tracker.refresh());
        first.end_track(1);
        assert!(!tracker.refresh());
        assert_eq!(tracker.tracked(), 1);
        assert!(tracker.is_recording());

        second.end_track(0);
        // 下一次刷新（事件或轮询）之前仍视为录制中
        assert!(tracker.is_recording());
        assert!(tracker.refresh());
        assert!(!tracker.is_recording());
        assert_eq!(tracker.tracked(), 0);
    }

    #[test]
    fn test_refresh_reports_stop_once() {
        let mut tracker = CaptureTracker::new();
        let stream = FakeStream::with_tracks(1);
        tracker.add(stream.clone());
        assert!(!tracker.refresh());

        stream.end_track(0);
        assert!(tracker.refresh());
        assert!(!tracker.refresh());

        // 未录制时刷新无变化
        let mut idle: CaptureTracker<FakeStream> = CaptureTracker::new();
        assert!(!idle.refresh());
    }

    #[test]
    fn test_clear_on_unmount() {
        let mut tracker = CaptureTracker::new();
        tracker.add(FakeStream::with_tracks(1));
        tracker.clear();
        assert!(!tracker.is_recording());
        assert_eq!(tracker.tracked(), 0);
    }
}
