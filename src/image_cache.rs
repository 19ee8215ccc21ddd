use std::{collections::HashMap, io::Read};

use egui_extras::RetainedImage;

use crate::{RequestPaint, TaskQueue};

pub type ImageResult = Result<Vec<u8>, String>;

/// Downloads card images on a background thread.
pub struct ImageFetcher {
    queue: TaskQueue<String, ImageResult>,
}

impl ImageFetcher {
    /// Larger bodies are cut off, they won't decode.
    const MAX_BYTES: u64 = 8 * 1024 * 1024;

    pub fn new(repaint: impl RequestPaint + 'static) -> Self {
        Self {
            queue: TaskQueue::new(repaint, Self::spawn),
        }
    }

    pub fn fetch(&self, url: impl ToString) {
        self.queue.enqueue(url.to_string())
    }

    pub fn try_next(&self) -> Option<(String, ImageResult)> {
        self.queue.try_next()
    }

    pub fn join(self) -> Vec<(String, ImageResult)> {
        self.queue.join()
    }

    fn spawn(
        repaint: impl RequestPaint,
        queue: flume::Receiver<String>,
        ready: flume::Sender<(String, ImageResult)>,
    ) {
        let agent = ureq::agent();
        for url in queue {
            log::debug!("fetching image: {url}");

            let result = Self::download(&agent, &url);
            if let Err(err) = &result {
                log::warn!("cannot fetch image {url}: {err}");
            }

            let _ = ready.send((url, result));
            repaint.request_repaint();
        }

        log::debug!("end of image fetch loop")
    }

    fn download(agent: &ureq::Agent, url: &str) -> ImageResult {
        let resp = agent.get(url).call().map_err(|err| err.to_string())?;

        let mut data = Vec::with_capacity(32 * 1024);
        resp.into_reader()
            .take(Self::MAX_BYTES)
            .read_to_end(&mut data)
            .map_err(|err| err.to_string())?;
        Ok(data)
    }
}

enum Slot {
    Pending,
    Ready(RetainedImage),
    Failed,
}

/// Decoded card images, keyed by their url.
#[derive(Default)]
pub struct ImageCache {
    map: HashMap<String, Slot>,
}

impl ImageCache {
    /// Marks the urls not seen before as pending and returns them.
    pub fn request<'a>(&mut self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut wanted = vec![];
        for url in urls {
            if self.map.contains_key(url) {
                continue;
            }
            self.map.insert(url.to_string(), Slot::Pending);
            wanted.push(url.to_string());
        }
        wanted
    }

    pub fn add(&mut self, url: String, data: ImageResult) {
        let slot = match data.and_then(|data| RetainedImage::from_image_bytes(&*url, &data)) {
            Ok(image) => {
                log::debug!("image cache: adding: {url}");
                Slot::Ready(image)
            }
            Err(err) => {
                log::warn!("cannot load image {url}: {err}");
                Slot::Failed
            }
        };
        self.map.insert(url, slot);
    }

    pub fn get(&self, url: &str) -> Option<&RetainedImage> {
        match self.map.get(url)? {
            Slot::Ready(image) => Some(image),
            _ => None,
        }
    }

    pub fn is_pending(&self, url: &str) -> bool {
        matches!(self.map.get(url), Some(Slot::Pending))
    }
}
