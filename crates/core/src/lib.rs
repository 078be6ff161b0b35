pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod region;
}

pub mod blurring {
    pub mod domain {
        pub mod frame_blurrer;
    }
    pub mod infrastructure;
}

pub mod overlay {
    pub mod domain {
        pub mod label_renderer;
    }
    pub mod infrastructure;
}

pub mod compositing;

pub mod vision {
    pub mod domain {
        pub mod vision_model;
    }
    pub mod infrastructure;
}

pub mod io {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod vision_tasks;
}
